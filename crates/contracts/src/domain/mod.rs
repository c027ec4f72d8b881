pub mod a001_store;
pub mod a002_employee;
pub mod a003_task;
pub mod a004_team;
pub mod a005_visit;
pub mod a006_note;
pub mod a007_brand_pros_cons;

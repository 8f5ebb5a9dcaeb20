pub mod address;
pub mod bank_details;
pub mod education;
pub mod employee;
pub mod employment_history;
pub mod file;
pub mod form;
pub mod government_ids;
pub mod previous_employment;
pub mod signature;
pub mod submission;
pub mod view;

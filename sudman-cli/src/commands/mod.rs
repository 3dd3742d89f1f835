mod doctor;
mod units;

pub use doctor::run_doctor;
pub use units::{run_action, run_list, run_logs, run_status};

pub mod appointment_controller;
pub mod auth_controller;
pub mod client_controller;
pub mod inventory_controller;
pub mod punch_controller;
pub mod report_controller;
pub mod user_controller;
pub mod vacation_controller;
pub mod vehicle_controller;
pub mod work_order_controller;

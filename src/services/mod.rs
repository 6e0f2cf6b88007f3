//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación. Los
//! servicios trabajan sobre el `Store` y no conocen HTTP.

pub mod auth_service;
pub mod authorization_service;
pub mod cascade_service;
pub mod client_import_service;
pub mod inventory_service;
pub mod punch_service;
pub mod report_service;
pub mod time_tracking;
pub mod vacation_service;
pub mod work_order_service;

pub use auth_service::AuthService;
pub use cascade_service::CascadeService;
pub use client_import_service::ClientImportService;
pub use inventory_service::InventoryService;
pub use punch_service::PunchService;
pub use report_service::ReportService;
pub use vacation_service::VacationService;
pub use work_order_service::WorkOrderService;

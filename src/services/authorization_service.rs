//! Política de permisos
//!
//! Tabla única rol → capacidades. Los predicados `can_*` reciben el rol
//! como texto: un rol desconocido o vacío nunca tiene permisos.

use serde::Serialize;

use crate::models::auth::UserRole;

/// Capacidades del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ManageUsers,
    ViewClients,
    ManageClients,
    ImportClients,
    ManageVehicles,
    CreateWorkOrders,
    ViewAllWorkOrders,
    WorkOnOrders,
    CancelWorkOrders,
    DeleteWorkOrders,
    ManageInventory,
    ViewAppointments,
    ManageAppointments,
    RequestVacations,
    ApproveVacations,
    EditPunches,
    ViewReports,
}

impl Capability {
    pub const ALL: [Capability; 17] = [
        Capability::ManageUsers,
        Capability::ViewClients,
        Capability::ManageClients,
        Capability::ImportClients,
        Capability::ManageVehicles,
        Capability::CreateWorkOrders,
        Capability::ViewAllWorkOrders,
        Capability::WorkOnOrders,
        Capability::CancelWorkOrders,
        Capability::DeleteWorkOrders,
        Capability::ManageInventory,
        Capability::ViewAppointments,
        Capability::ManageAppointments,
        Capability::RequestVacations,
        Capability::ApproveVacations,
        Capability::EditPunches,
        Capability::ViewReports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ManageUsers => "manage_users",
            Capability::ViewClients => "view_clients",
            Capability::ManageClients => "manage_clients",
            Capability::ImportClients => "import_clients",
            Capability::ManageVehicles => "manage_vehicles",
            Capability::CreateWorkOrders => "create_work_orders",
            Capability::ViewAllWorkOrders => "view_all_work_orders",
            Capability::WorkOnOrders => "work_on_orders",
            Capability::CancelWorkOrders => "cancel_work_orders",
            Capability::DeleteWorkOrders => "delete_work_orders",
            Capability::ManageInventory => "manage_inventory",
            Capability::ViewAppointments => "view_appointments",
            Capability::ManageAppointments => "manage_appointments",
            Capability::RequestVacations => "request_vacations",
            Capability::ApproveVacations => "approve_vacations",
            Capability::EditPunches => "edit_punches",
            Capability::ViewReports => "view_reports",
        }
    }
}

const SHOP_MANAGER: &[Capability] = &[
    Capability::ViewClients,
    Capability::ManageClients,
    Capability::ImportClients,
    Capability::ManageVehicles,
    Capability::CreateWorkOrders,
    Capability::ViewAllWorkOrders,
    Capability::WorkOnOrders,
    Capability::CancelWorkOrders,
    Capability::DeleteWorkOrders,
    Capability::ManageInventory,
    Capability::ViewAppointments,
    Capability::ManageAppointments,
    Capability::RequestVacations,
    Capability::ApproveVacations,
    Capability::EditPunches,
    Capability::ViewReports,
];

const TECHNICIAN: &[Capability] = &[
    Capability::ViewClients,
    Capability::WorkOnOrders,
    Capability::ViewAppointments,
    Capability::RequestVacations,
];

const RECEPTION: &[Capability] = &[
    Capability::ViewClients,
    Capability::ManageClients,
    Capability::ImportClients,
    Capability::ManageVehicles,
    Capability::CreateWorkOrders,
    Capability::ViewAllWorkOrders,
    Capability::ViewAppointments,
    Capability::ManageAppointments,
    Capability::RequestVacations,
];

/// Capacidades concedidas a cada rol
pub fn capabilities_for(role: UserRole) -> &'static [Capability] {
    match role {
        UserRole::Admin => &Capability::ALL,
        UserRole::ShopManager => SHOP_MANAGER,
        UserRole::Technician => TECHNICIAN,
        UserRole::Reception => RECEPTION,
    }
}

/// Verifica si un rol tiene una capacidad
pub fn role_can(role: UserRole, capability: Capability) -> bool {
    capabilities_for(role).contains(&capability)
}

/// Verifica una capacidad a partir del rol en texto
pub fn can(role: &str, capability: Capability) -> bool {
    UserRole::parse(role).map_or(false, |role| role_can(role, capability))
}

/// Nombres de los permisos de un rol, tal y como se envían al cliente
pub fn permissions_for_role(role: UserRole) -> Vec<String> {
    capabilities_for(role)
        .iter()
        .map(|capability| capability.as_str().to_string())
        .collect()
}

pub fn can_manage_users(role: &str) -> bool {
    can(role, Capability::ManageUsers)
}

pub fn can_manage_clients(role: &str) -> bool {
    can(role, Capability::ManageClients)
}

pub fn can_manage_inventory(role: &str) -> bool {
    can(role, Capability::ManageInventory)
}

pub fn can_view_all_work_orders(role: &str) -> bool {
    can(role, Capability::ViewAllWorkOrders)
}

pub fn can_approve_vacations(role: &str) -> bool {
    can(role, Capability::ApproveVacations)
}

pub fn can_edit_punches(role: &str) -> bool {
    can(role, Capability::EditPunches)
}

pub fn can_view_reports(role: &str) -> bool {
    can(role, Capability::ViewReports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manage_clients_by_role() {
        assert!(!can_manage_clients("technician"));
        assert!(can_manage_clients("admin"));
        assert!(can_manage_clients("reception"));
        assert!(can_manage_clients("shop-manager"));
    }

    #[test]
    fn test_unknown_role_has_no_capability() {
        for capability in Capability::ALL {
            assert!(!can("", capability));
            assert!(!can("superuser", capability));
        }
    }

    #[test]
    fn test_admin_has_everything() {
        for capability in Capability::ALL {
            assert!(role_can(UserRole::Admin, capability));
        }
    }

    #[test]
    fn test_only_admin_manages_users() {
        let managers: Vec<UserRole> = UserRole::ALL
            .into_iter()
            .filter(|role| role_can(*role, Capability::ManageUsers))
            .collect();
        assert_eq!(managers, vec![UserRole::Admin]);
        assert!(!can_manage_users("shop_manager"));
    }

    #[test]
    fn test_technician_capabilities() {
        assert!(role_can(UserRole::Technician, Capability::WorkOnOrders));
        assert!(!can_view_all_work_orders("technician"));
        assert!(!can_approve_vacations("technician"));
        assert!(!can_edit_punches("technician"));
        assert!(!can_view_reports("technician"));
        assert!(!can_manage_inventory("technician"));
    }

    #[test]
    fn test_reception_cannot_approve_or_work() {
        assert!(!role_can(UserRole::Reception, Capability::ApproveVacations));
        assert!(!role_can(UserRole::Reception, Capability::WorkOnOrders));
        assert!(role_can(UserRole::Reception, Capability::ImportClients));
    }

    #[test]
    fn test_permissions_for_role_names() {
        let permissions = permissions_for_role(UserRole::Technician);
        assert_eq!(
            permissions,
            vec!["view_clients", "work_on_orders", "view_appointments", "request_vacations"]
        );
    }
}

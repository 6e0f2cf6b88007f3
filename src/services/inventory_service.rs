//! Servicio de inventario y materiales
//!
//! Los materiales de un parte descuentan stock del artículo con la misma
//! referencia, si existe. Un material sin artículo en inventario se
//! registra sin más.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::inventory::{CreateInventoryItemRequest, InventoryItem, UpdateInventoryItemRequest};
use crate::models::material::{CreateMaterialRequest, MaterialUsed, NewMaterial, UpdateMaterialRequest};
use crate::models::work_order::WorkOrder;
use crate::repositories::{FieldValue, Store};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_positive_quantity;

pub struct InventoryService {
    store: Store,
}

impl InventoryService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn normalize_reference(reference: &str) -> String {
        reference.trim().to_ascii_uppercase()
    }

    /// Artículo de inventario asociado a una referencia
    pub async fn item_for_reference(&self, reference: &str) -> AppResult<Option<InventoryItem>> {
        let reference = Self::normalize_reference(reference);
        Ok(self
            .store
            .inventory
            .find_by("reference", FieldValue::Text(reference))
            .await?
            .into_iter()
            .next())
    }

    /// Ajusta el stock de la referencia en `delta` (negativo = salida)
    async fn adjust_stock(&self, reference: &str, delta: Decimal) -> AppResult<Option<InventoryItem>> {
        let Some(item) = self.item_for_reference(reference).await? else {
            return Ok(None);
        };

        let quantity = item.quantity + delta;
        if quantity < Decimal::ZERO {
            return Err(AppError::Conflict(format!(
                "Stock insuficiente de {}: disponibles {} {}, solicitados {}",
                item.reference,
                item.quantity,
                item.unit,
                -delta
            )));
        }

        let updated = self
            .store
            .inventory
            .update(
                item.id,
                UpdateInventoryItemRequest {
                    quantity: Some(quantity),
                    ..Default::default()
                },
            )
            .await?;

        if updated.is_low_stock() {
            tracing::warn!(
                "📉 Stock bajo de {}: {} {} (mínimo {})",
                updated.reference,
                updated.quantity,
                updated.unit,
                updated.min_stock
            );
        }
        Ok(Some(updated))
    }

    pub async fn list_materials(&self, work_order_id: Uuid) -> AppResult<Vec<MaterialUsed>> {
        self.store.work_orders.get_by_id(work_order_id).await?;
        let mut materials = self
            .store
            .materials
            .find_by("work_order_id", FieldValue::Uuid(work_order_id))
            .await?;
        materials.sort_by_key(|material| material.created_at);
        Ok(materials)
    }

    /// Parte que todavía admite cambios en sus materiales
    async fn open_order(&self, work_order_id: Uuid) -> AppResult<WorkOrder> {
        let order = self.store.work_orders.get_by_id(work_order_id).await?;
        if order.status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "El parte {} está {}: no admite cambios en materiales",
                order.order_number,
                order.status.as_str()
            )));
        }
        Ok(order)
    }

    pub async fn add_material(&self, work_order_id: Uuid, request: CreateMaterialRequest) -> AppResult<MaterialUsed> {
        validate_positive_quantity(request.quantity)?;
        let order = self.open_order(work_order_id).await?;

        let unit = match request.unit {
            Some(unit) => unit,
            None => self
                .item_for_reference(&request.reference)
                .await?
                .map_or_else(|| "ud".to_string(), |item| item.unit),
        };

        let material = self
            .store
            .materials
            .create(NewMaterial {
                work_order_id,
                reference: Self::normalize_reference(&request.reference),
                description: request.description.trim().to_string(),
                quantity: request.quantity,
                unit,
            })
            .await?;

        // Sin stock suficiente la línea no se queda en el parte
        if let Err(err) = self.adjust_stock(&material.reference, -material.quantity).await {
            self.store.materials.delete(material.id).await?;
            return Err(err);
        }

        tracing::info!(
            "🔧 Material {} x{} añadido al parte {}",
            material.reference,
            material.quantity,
            order.order_number
        );
        Ok(material)
    }

    /// Corrige una línea; la diferencia de cantidad se refleja en el stock
    pub async fn update_material(&self, id: Uuid, request: UpdateMaterialRequest) -> AppResult<MaterialUsed> {
        let material = self.store.materials.get_by_id(id).await?;
        self.open_order(material.work_order_id).await?;

        if let Some(quantity) = request.quantity {
            validate_positive_quantity(quantity)?;
            let delta = material.quantity - quantity;
            if delta != Decimal::ZERO {
                self.adjust_stock(&material.reference, delta).await?;
            }
        }

        self.store.materials.update(id, request).await
    }

    /// Quita una línea y devuelve su cantidad al stock
    pub async fn remove_material(&self, id: Uuid) -> AppResult<()> {
        let material = self.store.materials.get_by_id(id).await?;
        self.open_order(material.work_order_id).await?;

        self.store.materials.delete(id).await?;
        self.adjust_stock(&material.reference, material.quantity).await?;
        tracing::info!("↩️ Material {} devuelto al stock", material.reference);
        Ok(())
    }

    pub async fn list_items(&self) -> AppResult<Vec<InventoryItem>> {
        let mut items = self.store.inventory.get_all().await?;
        items.sort_by(|a, b| a.reference.cmp(&b.reference));
        Ok(items)
    }

    pub async fn get_item(&self, id: Uuid) -> AppResult<InventoryItem> {
        self.store.inventory.get_by_id(id).await
    }

    pub async fn create_item(&self, request: CreateInventoryItemRequest) -> AppResult<InventoryItem> {
        if request.quantity < Decimal::ZERO {
            return Err(AppError::BadRequest("El stock no puede ser negativo".to_string()));
        }
        self.store.inventory.create(request).await
    }

    pub async fn update_item(&self, id: Uuid, request: UpdateInventoryItemRequest) -> AppResult<InventoryItem> {
        if request.quantity.is_some_and(|quantity| quantity < Decimal::ZERO) {
            return Err(AppError::BadRequest("El stock no puede ser negativo".to_string()));
        }
        self.store.inventory.update(id, request).await
    }

    pub async fn delete_item(&self, id: Uuid) -> AppResult<()> {
        self.store.inventory.delete(id).await
    }

    /// Artículos activos con stock igual o inferior al mínimo
    pub async fn low_stock(&self) -> AppResult<Vec<InventoryItem>> {
        Ok(self
            .list_items()
            .await?
            .into_iter()
            .filter(InventoryItem::is_low_stock)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::work_order::{NewWorkOrder, WorkOrderPatch, WorkOrderStatus};
    use rust_decimal_macros::dec;

    async fn seed(store: &Store) -> (Uuid, InventoryItem) {
        let order = store
            .work_orders
            .create(NewWorkOrder {
                order_number: "OT-2026-0001".to_string(),
                client_id: None,
                client_name: Some("Cliente de paso".to_string()),
                vehicle_id: None,
                technician_id: None,
                priority: Default::default(),
                description: "Cambio de filtros".to_string(),
                estimated_hours: None,
            })
            .await
            .unwrap();

        let item = store
            .inventory
            .create(CreateInventoryItemRequest {
                reference: "flt-001".to_string(),
                description: "Filtro de aceite".to_string(),
                quantity: dec!(5),
                unit: None,
                min_stock: Some(dec!(2)),
                location: Some("A-1".to_string()),
            })
            .await
            .unwrap();

        (order.id, item)
    }

    fn material(reference: &str, quantity: Decimal) -> CreateMaterialRequest {
        CreateMaterialRequest {
            reference: reference.to_string(),
            description: "Filtro".to_string(),
            quantity,
            unit: None,
        }
    }

    #[tokio::test]
    async fn test_add_material_decrements_stock() {
        let store = Store::in_memory();
        let (order_id, item) = seed(&store).await;
        let service = InventoryService::new(store);

        let added = service.add_material(order_id, material("FLT-001", dec!(3))).await.unwrap();
        assert_eq!(added.unit, "ud");
        assert_eq!(service.get_item(item.id).await.unwrap().quantity, dec!(2));

        let low = service.low_stock().await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].reference, "FLT-001");
    }

    #[tokio::test]
    async fn test_insufficient_stock_is_conflict() {
        let store = Store::in_memory();
        let (order_id, item) = seed(&store).await;
        let service = InventoryService::new(store.clone());

        let result = service.add_material(order_id, material("flt-001", dec!(6))).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(service.get_item(item.id).await.unwrap().quantity, dec!(5));
        assert!(store.materials.get_all().await.unwrap().is_empty());

        // Tras el rechazo el parte sigue aceptando lo que sí hay
        service.add_material(order_id, material("flt-001", dec!(5))).await.unwrap();
        assert_eq!(service.list_materials(order_id).await.unwrap().len(), 1);
        assert_eq!(service.get_item(item.id).await.unwrap().quantity, dec!(0));
    }

    #[tokio::test]
    async fn test_material_without_inventory_item() {
        let store = Store::in_memory();
        let (order_id, _) = seed(&store).await;
        let service = InventoryService::new(store);

        let added = service.add_material(order_id, material("tornillo-m8", dec!(12))).await.unwrap();
        assert_eq!(added.reference, "TORNILLO-M8");
    }

    #[tokio::test]
    async fn test_remove_and_update_return_stock() {
        let store = Store::in_memory();
        let (order_id, item) = seed(&store).await;
        let service = InventoryService::new(store);

        let added = service.add_material(order_id, material("FLT-001", dec!(2))).await.unwrap();
        service
            .update_material(
                added.id,
                UpdateMaterialRequest {
                    quantity: Some(dec!(1)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(service.get_item(item.id).await.unwrap().quantity, dec!(4));

        service.remove_material(added.id).await.unwrap();
        assert_eq!(service.get_item(item.id).await.unwrap().quantity, dec!(5));
    }

    #[tokio::test]
    async fn test_rejects_non_positive_and_terminal_orders() {
        let store = Store::in_memory();
        let (order_id, _) = seed(&store).await;
        let service = InventoryService::new(store.clone());

        assert!(matches!(
            service.add_material(order_id, material("FLT-001", dec!(0))).await,
            Err(AppError::BadRequest(_))
        ));

        store
            .work_orders
            .update(
                order_id,
                WorkOrderPatch {
                    status: Some(WorkOrderStatus::Cancelled),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(matches!(
            service.add_material(order_id, material("FLT-001", dec!(1))).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_completed_order_materials_are_frozen() {
        let store = Store::in_memory();
        let (order_id, item) = seed(&store).await;
        let service = InventoryService::new(store.clone());

        let added = service.add_material(order_id, material("FLT-001", dec!(2))).await.unwrap();
        store
            .work_orders
            .update(
                order_id,
                WorkOrderPatch {
                    status: Some(WorkOrderStatus::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let update = UpdateMaterialRequest {
            quantity: Some(dec!(1)),
            ..Default::default()
        };
        assert!(matches!(
            service.update_material(added.id, update).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            service.remove_material(added.id).await,
            Err(AppError::Conflict(_))
        ));

        assert_eq!(store.materials.get_by_id(added.id).await.unwrap().quantity, dec!(2));
        assert_eq!(service.get_item(item.id).await.unwrap().quantity, dec!(3));
    }
}

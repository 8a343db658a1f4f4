use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::RecordId,
    error::ApiError,
    protocol::{Customer, CustomerPayload, Product, ProductPayload},
};
use tokio::sync::RwLock;

/// A record kind the backend serves under `/api/<segment>`.
pub trait Resource: Clone + Serialize + Send + Sync + 'static {
    type Payload: DeserializeOwned + Send + 'static;

    /// Capitalised singular used in response messages.
    const NOUN: &'static str;

    fn table(store: &Store) -> &RwLock<Table<Self>>;

    fn build(id: RecordId, payload: Self::Payload) -> Result<Self, ApiError>;
}

pub struct Table<R> {
    rows: BTreeMap<RecordId, R>,
    next_id: i64,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

#[derive(Default)]
pub struct Store {
    customers: RwLock<Table<Customer>>,
    products: RwLock<Table<Product>>,
}

impl Store {
    pub async fn list<R: Resource>(&self) -> Vec<R> {
        R::table(self).read().await.rows.values().cloned().collect()
    }

    pub async fn get<R: Resource>(&self, id: RecordId) -> Result<R, ApiError> {
        R::table(self)
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found::<R>())
    }

    pub async fn create<R: Resource>(&self, payload: R::Payload) -> Result<RecordId, ApiError> {
        let mut table = R::table(self).write().await;
        let id = RecordId(table.next_id);
        let record = R::build(id, payload)?;
        table.next_id += 1;
        table.rows.insert(id, record);
        Ok(id)
    }

    pub async fn update<R: Resource>(
        &self,
        id: RecordId,
        payload: R::Payload,
    ) -> Result<(), ApiError> {
        let mut table = R::table(self).write().await;
        if !table.rows.contains_key(&id) {
            return Err(not_found::<R>());
        }
        let record = R::build(id, payload)?;
        table.rows.insert(id, record);
        Ok(())
    }

    pub async fn delete<R: Resource>(&self, id: RecordId) -> Result<(), ApiError> {
        R::table(self)
            .write()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found::<R>())
    }

    pub async fn seed_demo_data(&self) -> Result<(), ApiError> {
        let customers = [
            ("Ferretería Central", "Av. Maldonado 120", "02-2650-100"),
            ("Comercial Andrade", "Calle Ajaví 45", "02-2651-200"),
        ];
        for (name, address, phone) in customers {
            self.create::<Customer>(CustomerPayload {
                name: name.into(),
                address: Some(address.into()),
                phone: Some(phone.into()),
            })
            .await?;
        }
        for (name, price) in [("Martillo", 12.5), ("Destornillador", 4.75)] {
            self.create::<Product>(ProductPayload {
                name: name.into(),
                price,
            })
            .await?;
        }
        Ok(())
    }
}

fn not_found<R: Resource>() -> ApiError {
    ApiError::not_found(format!("{} no encontrado", R::NOUN))
}

fn required_name(name: String) -> Result<String, ApiError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::validation("El nombre es obligatorio"));
    }
    Ok(name)
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Resource for Customer {
    type Payload = CustomerPayload;

    const NOUN: &'static str = "Cliente";

    fn table(store: &Store) -> &RwLock<Table<Self>> {
        &store.customers
    }

    fn build(id: RecordId, payload: CustomerPayload) -> Result<Self, ApiError> {
        Ok(Customer {
            id,
            name: required_name(payload.name)?,
            address: blank_to_none(payload.address),
            phone: blank_to_none(payload.phone),
        })
    }
}

impl Resource for Product {
    type Payload = ProductPayload;

    const NOUN: &'static str = "Producto";

    fn table(store: &Store) -> &RwLock<Table<Self>> {
        &store.products
    }

    fn build(id: RecordId, payload: ProductPayload) -> Result<Self, ApiError> {
        if !payload.price.is_finite() || payload.price < 0.0 {
            return Err(ApiError::validation("El precio debe ser un número no negativo"));
        }
        Ok(Product {
            id,
            name: required_name(payload.name)?,
            price: payload.price,
        })
    }
}

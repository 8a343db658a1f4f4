use shared::{
    domain::RecordId,
    protocol::{Customer, CustomerPayload},
};

use crate::{
    entity::{Entity, EntityLabels, FieldKind, FieldSpec, NAME_FIELD},
    form::{FormError, FormValues},
};

const ADDRESS_FIELD: FieldSpec = FieldSpec::new("direccion", "Dirección", FieldKind::Text);
const PHONE_FIELD: FieldSpec = FieldSpec::new("telefono", "Teléfono", FieldKind::Text);

pub struct Customers;

impl Entity for Customers {
    type Record = Customer;
    type Payload = CustomerPayload;

    const ENDPOINT: &'static str = "customers";
    const LABELS: EntityLabels = EntityLabels {
        singular: "cliente",
        plural: "clientes",
        empty: "No hay clientes registrados",
        create_title: "Agregar Nuevo Cliente",
        create_submit: "Agregar Cliente",
        edit_title: "Editar Cliente",
        edit_submit: "Actualizar Cliente",
        delete_prompt: "¿Estás seguro de que quieres eliminar este cliente?",
    };
    const COLUMNS: &'static [&'static str] = &["ID", "Nombre", "Dirección", "Teléfono"];
    const FIELDS: &'static [FieldSpec] = &[NAME_FIELD, ADDRESS_FIELD, PHONE_FIELD];

    fn record_id(record: &Customer) -> RecordId {
        record.id
    }

    fn cells(record: &Customer) -> Vec<String> {
        vec![
            record.id.to_string(),
            record.name.clone(),
            record.address.clone().unwrap_or_default(),
            record.phone.clone().unwrap_or_default(),
        ]
    }

    fn form_values(record: &Customer) -> FormValues {
        let mut values = FormValues::default();
        values.set(NAME_FIELD.name, &record.name);
        values.set(ADDRESS_FIELD.name, record.address.as_deref().unwrap_or_default());
        values.set(PHONE_FIELD.name, record.phone.as_deref().unwrap_or_default());
        values
    }

    fn payload(values: &FormValues) -> Result<CustomerPayload, FormError> {
        Ok(CustomerPayload {
            name: values.required_text(&NAME_FIELD)?,
            address: values.optional_text(&ADDRESS_FIELD),
            phone: values.optional_text(&PHONE_FIELD),
        })
    }
}

use shared::{
    domain::RecordId,
    protocol::{Product, ProductPayload},
};

use crate::{
    entity::{format_price, Entity, EntityLabels, FieldKind, FieldSpec, NAME_FIELD},
    form::{FormError, FormValues},
};

const PRICE_FIELD: FieldSpec = FieldSpec::new("precio", "Precio", FieldKind::Price);

pub struct Products;

impl Entity for Products {
    type Record = Product;
    type Payload = ProductPayload;

    const ENDPOINT: &'static str = "products";
    const LABELS: EntityLabels = EntityLabels {
        singular: "producto",
        plural: "productos",
        empty: "No hay productos registrados",
        create_title: "Agregar Nuevo Producto",
        create_submit: "Agregar Producto",
        edit_title: "Editar Producto",
        edit_submit: "Actualizar Producto",
        delete_prompt: "¿Estás seguro de que quieres eliminar este producto?",
    };
    const COLUMNS: &'static [&'static str] = &["ID", "Nombre", "Precio"];
    const FIELDS: &'static [FieldSpec] = &[NAME_FIELD, PRICE_FIELD];

    fn record_id(record: &Product) -> RecordId {
        record.id
    }

    fn cells(record: &Product) -> Vec<String> {
        vec![
            record.id.to_string(),
            record.name.clone(),
            format_price(record.price),
        ]
    }

    fn form_values(record: &Product) -> FormValues {
        let mut values = FormValues::default();
        values.set(NAME_FIELD.name, &record.name);
        values.set(PRICE_FIELD.name, format!("{:.2}", record.price));
        values
    }

    fn payload(values: &FormValues) -> Result<ProductPayload, FormError> {
        Ok(ProductPayload {
            name: values.required_text(&NAME_FIELD)?,
            price: values.price(&PRICE_FIELD)?,
        })
    }
}

//! Fixed business constants: sheet and column names, entity names,
//! warehouse tables and the family allow-list.

/// Sheet read from every source workbook.
pub const SOURCE_SHEET: &str = "DataSheet";

/// Source files whose path contains this (case-insensitive) are never loaded.
pub const EXCLUDED_PATH_FRAGMENT: &str = "servigral";

/// Rows of this entity are dropped while loading.
pub const EXCLUDED_ENTITY: &str = "IFRS Servigral";

/// Reference rows with this company tag feed the SKU remap.
pub const REMAP_COMPANY_TAG: &str = "AGRAC";

/// Entities whose SKUs are rewritten through the AGRAC mapping.
pub const REMAP_ENTITIES: [&str; 2] = ["IFRS Agrac", "IFRS AGSE SAS"];

/// Cell text read as missing, as spreadsheet readers conventionally do.
pub const NA_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Source columns (raw name, canonical name)
// ---------------------------------------------------------------------------

pub const COL_COMPANY: (&str, &str) = ("Nbre.Complet.Empresa", "Empresa");
pub const COL_INVOICE: (&str, &str) = ("FACTURA", "Factura");
pub const COL_DATE: (&str, &str) = ("FECHA", "Fecha");
pub const COL_SUPPLIER: (&str, &str) = ("PROVEEDOR", "Proveedor");
pub const COL_SUB_ZONE: (&str, &str) = ("SUB ZONA", "Sub_Zona");
pub const COL_ZONE: (&str, &str) = ("ZONA", "Zona");
pub const COL_BUSINESS_LINE: (&str, &str) = ("LINEA DE NEGOCIO", "Linea_Negocio");
pub const COL_PRODUCT_TYPE: (&str, &str) = ("TIPO ( PRODUCTO)", "Tipo_Producto");
pub const COL_PART_NUMBER: (&str, &str) = ("No. de Parte", "SKU");
pub const COL_PART_DESCRIPTION: (&str, &str) = ("Descripc. de Parte", "Descripcion_Producto");
pub const COL_FAMILY_CODE: (&str, &str) = ("Familia", "Codigo_Familia");
pub const COL_FAMILY_DESCRIPTION: (&str, &str) = ("Descripc.de Familia", "Descripcion_Familia");
pub const COL_QUANTITY: (&str, &str) = ("Cantidad", "Cantidad");
pub const COL_REVENUE: (&str, &str) = ("Ingreso por Venta", "Ingreso_Venta");
pub const COL_YEAR: (&str, &str) = ("Año", "Año");
pub const COL_MONTH: (&str, &str) = ("Mes", "Mes");
pub const COL_WAREHOUSE: (&str, &str) = ("Bodega Despacho", "Codigo_Bodega");

/// The 17 relevant source columns, in canonical order.
pub const SOURCE_COLUMNS: [(&str, &str); 17] = [
    COL_COMPANY,
    COL_INVOICE,
    COL_DATE,
    COL_SUPPLIER,
    COL_SUB_ZONE,
    COL_ZONE,
    COL_BUSINESS_LINE,
    COL_PRODUCT_TYPE,
    COL_PART_NUMBER,
    COL_PART_DESCRIPTION,
    COL_FAMILY_CODE,
    COL_FAMILY_DESCRIPTION,
    COL_QUANTITY,
    COL_REVENUE,
    COL_YEAR,
    COL_MONTH,
    COL_WAREHOUSE,
];

/// Output header row: the canonical columns followed by the homologated ones.
pub const OUTPUT_COLUMNS: [&str; 24] = [
    COL_COMPANY.1,
    COL_INVOICE.1,
    COL_DATE.1,
    COL_SUPPLIER.1,
    COL_SUB_ZONE.1,
    COL_ZONE.1,
    COL_BUSINESS_LINE.1,
    COL_PRODUCT_TYPE.1,
    COL_PART_NUMBER.1,
    COL_PART_DESCRIPTION.1,
    COL_FAMILY_CODE.1,
    COL_FAMILY_DESCRIPTION.1,
    COL_QUANTITY.1,
    COL_REVENUE.1,
    COL_YEAR.1,
    COL_MONTH.1,
    COL_WAREHOUSE.1,
    "Marca",
    "Ingrediente_Activo_1",
    "Ingrediente_Activo_2",
    "Unidad_Medida",
    "Linea_Negocio_Proveedor",
    "Nombre_Macro_Familia",
    "Proveedor_Homologado",
];

// ---------------------------------------------------------------------------
// Reference workbook columns
// ---------------------------------------------------------------------------

pub const REF_COMPANY: &str = "COMPAÑÍA";
pub const REF_INITIAL_SKU: &str = "SKU INICIAL";
pub const REF_FINAL_SKU: &str = "SKU FINAL";
pub const REF_BRAND: &str = "MARCA";
pub const REF_ACTIVE_INGREDIENT_1: &str = "INGREDIENTE ACTIVO 1";
pub const REF_ACTIVE_INGREDIENT_2: &str = "INGREDIENTE ACTIVO 2";
pub const REF_UNIT: &str = "UNIDAD MEDIDA";
pub const REF_SUPPLIER_LINE: &str = "LINEA NEGOCIO PROVEEDOR";
pub const REF_MACRO_FAMILY: &str = "NOMBRE MACRO-FAMILIA";
pub const REF_SUPPLIER: &str = "PROVEEDOR GIOVANNA HOMOLOGADO";
pub const REF_FAMILY_DESCRIPTION: &str = "DESCRIPCION FAMILIA";

// ---------------------------------------------------------------------------
// Warehouses + families
// ---------------------------------------------------------------------------

/// Satellite warehouse -> canonical warehouse.
pub const WAREHOUSE_REMAP: [(&str, &str); 6] = [
    ("5515", "5510"),
    ("5516", "5510"),
    ("5533", "5532"),
    ("5556", "5557"),
    ("5560", "5557"),
    ("5573", "5572"),
];

pub const WAREHOUSE_ALLOW_LIST: [&str; 16] = [
    "5510", "5512", "5513", "5530", "5531", "5532", "5542", "5552", "5554", "5555", "5557",
    "5570", "5572", "5585", "5587", "5588",
];

/// Product families kept in the output (compared after `text::normalize_label`).
pub const FAMILY_ALLOW_LIST: [&str; 10] = [
    "HERBICIDAS",
    "INSECTICIDAS",
    "FUNGICIDAS",
    "FERTILIZANTES SOLIDOS",
    "FERTILIZANTES LIQUIDOS",
    "COADYUVANTES",
    "BIOLOGICOS",
    "MEDICAMENTOS E INSTRUMENTAL",
    "SEMILLAS SEMESTRALES",
    "SEMILLAS VEGETALES",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remap_targets_are_allow_listed() {
        for (_, target) in WAREHOUSE_REMAP {
            assert!(WAREHOUSE_ALLOW_LIST.contains(&target), "{target} not allow-listed");
        }
    }

    #[test]
    fn satellites_are_not_allow_listed() {
        for (satellite, _) in WAREHOUSE_REMAP {
            assert!(!WAREHOUSE_ALLOW_LIST.contains(&satellite));
        }
    }

    #[test]
    fn output_starts_with_canonical_names() {
        for (i, (_, canonical)) in SOURCE_COLUMNS.iter().enumerate() {
            assert_eq!(OUTPUT_COLUMNS[i], *canonical);
        }
    }
}

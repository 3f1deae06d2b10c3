use crate::models::{Product, Store, StoreType};

/// Read-only product lookups for the order entry flow.
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self {
            products: seed_products(),
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<Product> {
        self.products.iter().find(|p| p.id == id).cloned()
    }

    pub fn find_by_code(&self, code: &str) -> Option<Product> {
        self.products.iter().find(|p| p.code == code).cloned()
    }

    pub fn get_all(&self) -> Vec<Product> {
        self.products.iter().filter(|p| p.is_active).cloned().collect()
    }

    pub fn search(&self, query: &str) -> Vec<Product> {
        let q = query.to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&q)
                    || p.code.to_lowercase().contains(&q)
                    || p.brand.to_lowercase().contains(&q)
                    || p.category.to_lowercase().contains(&q)
            })
            .cloned()
            .collect()
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only store lookups for the order entry flow.
pub struct StoreDirectory {
    stores: Vec<Store>,
}

impl StoreDirectory {
    pub fn new() -> Self {
        Self {
            stores: seed_stores(),
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<Store> {
        self.stores.iter().find(|s| s.id == id).cloned()
    }

    pub fn find_by_code(&self, code: &str) -> Option<Store> {
        self.stores.iter().find(|s| s.code == code).cloned()
    }

    pub fn get_all(&self) -> Vec<Store> {
        self.stores.iter().filter(|s| s.is_active).cloned().collect()
    }

    pub fn search(&self, query: &str) -> Vec<Store> {
        let q = query.to_lowercase();
        self.stores
            .iter()
            .filter(|s| {
                s.name.to_lowercase().contains(&q)
                    || s.code.to_lowercase().contains(&q)
                    || s.address
                        .as_deref()
                        .is_some_and(|a| a.to_lowercase().contains(&q))
            })
            .cloned()
            .collect()
    }
}

impl Default for StoreDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn product(id: &str, code: &str, name: &str, brand: &str, price: f64) -> Product {
    Product {
        id: id.into(),
        code: code.into(),
        name: name.into(),
        brand: brand.into(),
        category: "Skincare".into(),
        price,
        image_url: None,
        is_active: true,
    }
}

fn seed_products() -> Vec<Product> {
    vec![
        product("prod_001", "LUM-HL-200", "Lumina Hydra Lotion", "Lumina", 1200.0),
        product("prod_002", "LUM-HE-200", "Lumina Hydra Emulsion", "Lumina", 1300.0),
        product("prod_003", "LUM-HW-150", "Lumina Hydra Foaming Wash", "Lumina", 850.0),
        product("prod_004", "VEL-RC-30", "Velours Riche Cream", "Velours", 2500.0),
        product("prod_005", "VEL-RS-40", "Velours Riche Serum", "Velours", 2800.0),
        product("prod_006", "PUR-ML-200", "Pure Moist Lotion", "Pure", 1500.0),
        product("prod_007", "PUR-ME-200", "Pure Moist Emulsion", "Pure", 1600.0),
        product("prod_008", "ESS-PC-30", "Essenza Precious Cream", "Essenza", 1800.0),
        product("prod_009", "LUM-CM-30", "Lumina Clear Mask", "Lumina", 450.0),
        product("prod_010", "LUM-PW-100", "Lumina Powder Wash", "Lumina", 950.0),
    ]
}

fn seed_stores() -> Vec<Store> {
    vec![
        Store {
            id: "store_001".into(),
            code: "CTR-001".into(),
            name: "Riverside Mall Counter".into(),
            address: Some("999 Riverside Rd, Bangkok 10330".into()),
            phone: Some("02-123-4567".into()),
            store_type: StoreType::Counter,
            is_active: true,
        },
        Store {
            id: "store_002".into(),
            code: "CTR-002".into(),
            name: "Grand Plaza Counter".into(),
            address: Some("991 Grand Plaza Ave, Bangkok 10330".into()),
            phone: Some("02-234-5678".into()),
            store_type: StoreType::Counter,
            is_active: true,
        },
        Store {
            id: "store_003".into(),
            code: "EVT-001".into(),
            name: "Lumina Beauty Fair".into(),
            address: Some("444 Exhibition Hall, Bangkok 10330".into()),
            phone: Some("02-345-6789".into()),
            store_type: StoreType::Event,
            is_active: true,
        },
        Store {
            id: "store_004".into(),
            code: "POP-001".into(),
            name: "Lumina Pop-up Harbor Walk".into(),
            address: Some("693 Harbor Walk, Bangkok 10110".into()),
            phone: Some("02-456-7890".into()),
            store_type: StoreType::Popup,
            is_active: true,
        },
    ]
}

//! Catalog shared by the unit tests.

pub const CATALOG: &str = r#"
    [[materials]]
    id = "cire-soja"
    name = "Cire de soja"
    kind = "ingredient"
    standardized_price = "0,012"
    purchase_unit = "kg"

    [[materials]]
    id = "parfum-vanille"
    name = "Parfum vanille"
    kind = "ingredient"
    standardized_price = 0.08
    purchase_unit = "L"
    density = 0.9

    [[materials]]
    id = "pot-verre"
    name = "Pot verre 180 ml"
    kind = "packaging"
    standardized_price = 1.2
    purchase_unit = "piece"
    weight_per_piece = 160

    [[materials]]
    id = "carton-s"
    name = "Carton S"
    kind = "shipping_box"
    standardized_price = 0.45
    purchase_unit = "piece"
    weight_per_piece = 60

    [[materials]]
    id = "papier-kraft"
    name = "Papier kraft"
    kind = "shipping_consumable"
    standardized_price = 0.05
    purchase_unit = "piece"
    weight_per_piece = 10

    [[products]]
    id = "vanille"
    name = "Bougie vanille"
    margin_multiplier = 3.2
    shipping_box = "carton-s"
    recipe = [
        { material = "cire-soja", quantity = 180 },
        { material = "parfum-vanille", quantity = 10 },
    ]
    packaging = [{ material = "pot-verre", quantity = 1 }]
    consumables = [{ material = "papier-kraft", quantity = 2 }]

    [[products]]
    id = "figue"
    name = "Bougie figue"
    target_price_ttc = "24,90"
    recipe = [{ material = "cire-soja", quantity = 180 }]
    packaging = [{ material = "pot-verre", quantity = 1 }]

    [[shipping_rates]]
    service = "Locker"
    max_weight = 500
    cost = 3.6
    price = 5.2

    [[shipping_rates]]
    service = "Locker"
    max_weight = 1000
    cost = 4.4
    price = 6.3
"#;

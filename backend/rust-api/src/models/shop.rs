use serde::Serialize;

/// Cosmetic avatar item sold in the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShopItem {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: u32,
    pub icon: &'static str,
}

#[rustfmt::skip]
pub const CATALOG: &[ShopItem] = &[
    ShopItem { id: "gold-antenna", name: "Gouden Antenne", cost: 10, icon: "/assets/items/gold-antenna.png" },
    ShopItem { id: "mustache", name: "Snor", cost: 15, icon: "/assets/items/mustache.png" },
    ShopItem { id: "sunglasses", name: "Zonnebril", cost: 20, icon: "/assets/items/sunglasses.png" },
    ShopItem { id: "rocket-boots", name: "Raket Laarzen", cost: 25, icon: "/assets/items/rocket-boots.png" },
    ShopItem { id: "bower-tie", name: "Strikje", cost: 30, icon: "/assets/items/bow-tie.png" },
    ShopItem { id: "paint-bucket", name: "Verf Emmer", cost: 35, icon: "/assets/items/paint-bucket.png" },
    ShopItem { id: "headphones", name: "Koptelefoon", cost: 40, icon: "/assets/items/headphones.png" },
    ShopItem { id: "propeller-hat", name: "Propeller Pet", cost: 45, icon: "/assets/items/propeller-hat.png" },
    ShopItem { id: "red-balloon", name: "Rode Ballon", cost: 50, icon: "/assets/items/red-balloon.png" },
    ShopItem { id: "magic-wand", name: "Toverstaf", cost: 75, icon: "/assets/items/magic-wand.png" },
    ShopItem { id: "disco-ball", name: "Disco Bal", cost: 100, icon: "/assets/items/disco-ball.png" },
    ShopItem { id: "super-cape", name: "Super Cape", cost: 150, icon: "/assets/items/super-cape.png" },
];

pub fn find_item(id: &str) -> Option<&'static ShopItem> {
    CATALOG.iter().find(|item| item.id == id)
}

use crate::db::models::{Coffee, NewCoffee, NewPug, Pug};
use crate::db::sqlite::CafeStorage;
use crate::error::CafeError;
use serde_json::Value;
use tracing::info;

/// Rows created by [`seed`], already linked to their favorite coffee.
#[derive(Debug, Clone)]
pub struct Seeded {
    pub puppaccino: Coffee,
    pub mocha: Coffee,
    pub cody: Pug,
    pub doug: Pug,
    pub penny: Pug,
}

impl Seeded {
    /// Rows in creation order: both coffees, then Cody, Doug and Penny.
    pub fn into_rows(self) -> Result<[Value; 5], CafeError> {
        Ok([
            serde_json::to_value(self.puppaccino)?,
            serde_json::to_value(self.mocha)?,
            serde_json::to_value(self.cody)?,
            serde_json::to_value(self.doug)?,
            serde_json::to_value(self.penny)?,
        ])
    }
}

/// Drop and recreate both tables, then insert the sample coffees and pugs.
pub async fn seed(storage: &CafeStorage) -> Result<Seeded, CafeError> {
    storage.reset().await?;

    let puppaccino = storage
        .create_coffee(NewCoffee::new(
            "puppaccino",
            ["espresso", "frothed-milk", "love"],
        ))
        .await?;
    let mocha = storage
        .create_coffee(NewCoffee::new(
            "mocha",
            ["espresso", "hot-cocoa", "whipped-cream", "love"],
        ))
        .await?;

    let cody = storage.create_pug(NewPug::named("Cody").with_age(7)).await?;
    let doug = storage.create_pug(NewPug::named("Doug")).await?;
    let penny = storage.create_pug(NewPug::named("Penny")).await?;

    let cody = storage
        .set_favorite_coffee(cody.id, Some(puppaccino.id))
        .await?;
    let doug = storage.set_favorite_coffee(doug.id, Some(mocha.id)).await?;
    let penny = storage
        .set_favorite_coffee(penny.id, Some(puppaccino.id))
        .await?;

    info!(coffees = 2, pugs = 3, "database seeded");

    Ok(Seeded {
        puppaccino,
        mocha,
        cody,
        doug,
        penny,
    })
}

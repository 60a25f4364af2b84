//! Crafting ingredient lists and breakage refunds.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Share of the primary ingredient returned when a broken bed is destroyed.
pub const REFUND_RATIO: f32 = 0.25;

/// Error returned when an ingredient list can't be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ingredient list '{0}'")]
pub struct IngredientsError(pub String);

/// One crafting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ingredient {
    /// Host object id.
    pub item_id: i32,
    /// Amount required.
    pub quantity: u32,
}

impl Ingredient {
    /// Partial refund of this ingredient, or `None` when it rounds down to nothing.
    pub fn refund(self, ratio: f32) -> Option<Ingredient> {
        let quantity = (self.quantity as f32 * ratio).floor() as u32;
        (quantity > 0).then_some(Ingredient {
            item_id: self.item_id,
            quantity,
        })
    }
}

/// Ingredient list in the host's `"<id> <qty> <id> <qty> ..."` form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ingredients(Vec<Ingredient>);

impl Ingredients {
    /// Construct from explicit inputs.
    pub fn new(inputs: Vec<Ingredient>) -> Self {
        Self(inputs)
    }

    /// Parse a space-separated id/quantity list.
    pub fn parse(input: &str) -> Result<Self, IngredientsError> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        if tokens.is_empty() || tokens.len() % 2 != 0 {
            return Err(IngredientsError(input.to_string()));
        }
        tokens
            .chunks(2)
            .map(|pair| {
                let item_id = pair[0].parse().ok()?;
                let quantity = pair[1].parse().ok()?;
                Some(Ingredient { item_id, quantity })
            })
            .collect::<Option<Vec<_>>>()
            .map(Self)
            .ok_or_else(|| IngredientsError(input.to_string()))
    }

    /// First ingredient, the one refunded on destruction.
    pub fn primary(&self) -> Option<Ingredient> {
        self.0.first().copied()
    }

    /// All ingredients in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.0.iter()
    }
}

impl FromStr for Ingredients {
    type Err = IngredientsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Ingredients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for ingredient in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{} {}", ingredient.item_id, ingredient.quantity)?;
            first = false;
        }
        Ok(())
    }
}

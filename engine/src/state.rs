use units::token::{Side, Token};

/// The two linked amount fields and their tokens.
///
/// Invariant: the side not equal to `last_edited` is never
/// user-authoritative; it is either empty or derived from the most recent
/// settled quote.
#[derive(Debug, Clone)]
pub struct AmountState {
    pub from_token: Token,
    pub to_token: Token,
    /// Display-unit decimal string; empty means no value entered.
    pub from_amount: String,
    pub to_amount: String,
    pub last_edited: Side,
}

impl AmountState {
    pub fn new(from_token: Token, to_token: Token) -> Self {
        Self {
            from_token,
            to_token,
            from_amount: String::new(),
            to_amount: String::new(),
            last_edited: Side::In,
        }
    }

    pub fn token(&self, side: Side) -> &Token {
        match side {
            Side::In => &self.from_token,
            Side::Out => &self.to_token,
        }
    }

    pub fn amount(&self, side: Side) -> &str {
        match side {
            Side::In => &self.from_amount,
            Side::Out => &self.to_amount,
        }
    }

    pub fn set_amount(&mut self, side: Side, value: impl Into<String>) {
        match side {
            Side::In => self.from_amount = value.into(),
            Side::Out => self.to_amount = value.into(),
        }
    }

    /// Swap token and amount roles between the two sides.
    pub fn switch(&mut self) {
        std::mem::swap(&mut self.from_token, &mut self.to_token);
        std::mem::swap(&mut self.from_amount, &mut self.to_amount);
        self.last_edited = self.last_edited.opposite();
    }
}

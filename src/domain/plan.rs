use rust_decimal::Decimal;

/// Any non-empty title is accepted; the plan catalogue lives in the frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanTitle(String);

impl PlanTitle {
    pub fn parse(s: String) -> Result<PlanTitle, String> {
        let s = s.trim().to_string();
        if s.is_empty() {
            Err("O título do plano não pode ficar em branco.".to_string())
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for PlanTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Monthly price in BRL, kept with two decimal places. Must fit the
/// `NUMERIC(10,2)` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanPrice(Decimal);

fn price_ceiling() -> Decimal {
    Decimal::new(100_000_000, 0)
}

impl PlanPrice {
    pub fn parse(value: Decimal) -> Result<PlanPrice, String> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(format!("O preço do plano não pode ser negativo: {}.", value));
        }
        let value = value.round_dp(2);
        if value >= price_ceiling() {
            return Err(format!(
                "O preço do plano deve ser menor que {}: {}.",
                price_ceiling(),
                value
            ));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

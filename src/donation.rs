use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::notice::Notice;

const MINIMUM_CENTS: u32 = 100;

/// A donation amount in euro cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(u32);

impl Amount {
    pub fn from_cents(cents: u32) -> anyhow::Result<Self> {
        if cents < MINIMUM_CENTS {
            anyhow::bail!("the minimum donation is €1");
        }
        Ok(Self(cents))
    }

    pub fn from_euros(euros: u32) -> anyhow::Result<Self> {
        euros
            .checked_mul(100)
            .ok_or_else(|| anyhow::anyhow!("donation amount is too large"))
            .and_then(Self::from_cents)
    }

    pub fn cents(&self) -> u32 {
        self.0
    }
}

impl FromStr for Amount {
    type Err = anyhow::Error;

    /// Accepts `10`, `10.5`, `10,50` and `€10`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().trim_start_matches('€').trim().replace(',', ".");
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            anyhow::bail!("`{}` is not an amount in euros", s);
        }
        if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
            anyhow::bail!("`{}` has more than two decimals", s);
        }

        let euros: u32 = whole.parse()?;
        let cents: u32 = format!("{:0<2}", fraction).parse()?;

        euros
            .checked_mul(100)
            .and_then(|it| it.checked_add(cents))
            .ok_or_else(|| anyhow::anyhow!("donation amount is too large"))
            .and_then(Self::from_cents)
    }
}

impl fmt::Display for Amount {
    /// Whole amounts print without decimals, as the widget expects.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}", self.0 / 100)
        } else {
            write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DonationTier {
    pub name: String,
    pub amount: u32,
    pub description: String,
    pub benefits: Vec<String>,
    #[serde(default)]
    pub popular: bool,
}

pub fn default_tiers() -> Vec<DonationTier> {
    vec![
        DonationTier {
            name: "Sostenitore".into(),
            amount: 10,
            description: "Contribuisci alla crescita della rivista".into(),
            benefits: vec![
                "Accesso prioritario ai nuovi articoli".into(),
                "Newsletter mensile esclusiva".into(),
            ],
            popular: false,
        },
        DonationTier {
            name: "Patrono".into(),
            amount: 25,
            description: "Sostieni attivamente la qualità dei contenuti".into(),
            benefits: vec![
                "Tutti i benefici del Sostenitore".into(),
                "Menzione nei ringraziamenti annuali".into(),
                "Accesso anticipato agli articoli speciali".into(),
            ],
            popular: true,
        },
        DonationTier {
            name: "Mecenate".into(),
            amount: 50,
            description: "Diventa parte integrante del progetto".into(),
            benefits: vec![
                "Tutti i benefici del Patrono".into(),
                "Possibilità di proporre temi per articoli".into(),
                "Invito agli eventi esclusivi online".into(),
            ],
            popular: false,
        },
    ]
}

/// The purchase unit handed to the payment widget.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PaymentOrder {
    pub value: String,
    pub currency_code: String,
    pub description: String,
}

impl PaymentOrder {
    pub fn new(amount: Amount, currency: &str, site_name: &str) -> Self {
        Self {
            value: amount.to_string(),
            currency_code: currency.to_owned(),
            description: format!("Donazione a {} - €{}", site_name, amount),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Completed,
    /// Approved, but capturing the payment failed.
    CaptureFailed,
    Cancelled,
    /// The widget reported an error.
    Failed,
    /// The widget script never loaded.
    WidgetUnavailable,
}

impl PaymentOutcome {
    pub fn notice(&self, amount: Amount) -> Notice {
        match self {
            Self::Completed => Notice::info(
                "Donazione completata!",
                format!(
                    "Grazie per la tua donazione di €{}. Il tuo supporto è fondamentale per noi.",
                    amount
                ),
            ),
            Self::CaptureFailed => Notice::error(
                "Errore nel pagamento",
                "Si è verificato un errore durante il pagamento. Riprova più tardi.",
            ),
            Self::Cancelled => Notice::info(
                "Pagamento annullato",
                "Hai annullato il pagamento. Puoi riprovare quando vuoi.",
            ),
            Self::Failed => Notice::error(
                "Errore PayPal",
                "Si è verificato un errore con PayPal. Riprova più tardi.",
            ),
            Self::WidgetUnavailable => Notice::error(
                "Errore",
                "Impossibile caricare PayPal. Riprova più tardi.",
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{default_tiers, Amount, PaymentOrder, PaymentOutcome};

    #[test]
    fn parses_amounts() {
        assert_eq!("10".parse::<Amount>().unwrap().cents(), 1000);
        assert_eq!("12.5".parse::<Amount>().unwrap().cents(), 1250);
        assert_eq!("€ 7,05".parse::<Amount>().unwrap().cents(), 705);
        assert_eq!("1".parse::<Amount>().unwrap().cents(), 100);
    }

    #[test]
    fn rejects_bad_amounts() {
        for bad in ["0", "0.99", "-5", "abc", "10.999", "", ".50", "1.2.3"] {
            assert!(bad.parse::<Amount>().is_err(), "{}", bad);
        }
    }

    #[test]
    fn display() {
        assert_eq!(Amount::from_euros(25).unwrap().to_string(), "25");
        assert_eq!("12.5".parse::<Amount>().unwrap().to_string(), "12.50");
    }

    #[test]
    fn order_for_widget() {
        let order = PaymentOrder::new(Amount::from_euros(10).unwrap(), "EUR", "Inter Leges");

        assert_eq!(order.value, "10");
        assert_eq!(order.currency_code, "EUR");
        assert_eq!(order.description, "Donazione a Inter Leges - €10");
    }

    #[test]
    fn tiers_and_notices() {
        let tiers = default_tiers();
        assert_eq!(tiers.iter().map(|t| t.amount).collect::<Vec<_>>(), vec![10, 25, 50]);
        assert_eq!(tiers.iter().filter(|t| t.popular).count(), 1);

        let amount = Amount::from_euros(50).unwrap();
        assert!(PaymentOutcome::Completed.notice(amount).description.contains("€50"));
        assert!(!PaymentOutcome::Cancelled.notice(amount).is_error());
        assert!(PaymentOutcome::Failed.notice(amount).is_error());
    }
}

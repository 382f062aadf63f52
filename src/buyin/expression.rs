use crate::domain::EventRecord;

const STRIPPED_GLYPHS: [char; 5] = ['$', '€', '£', '¥', ','];

/// Three-way reading of a buy-in string.
///
/// `parse_buyin` folds `Free` and `Unknown` together; this keeps them apart
/// for callers that want to show freerolls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuyinClass {
    Priced(f64),
    Free,
    Unknown,
}

impl BuyinClass {
    pub fn amount(self) -> Option<f64> {
        match self {
            BuyinClass::Priced(amount) => Some(amount),
            BuyinClass::Free | BuyinClass::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Add,
    Subtract,
}

/// Amount of a buy-in string such as "$1,000+$100", or `None` when it is not
/// a positive amount.
pub fn parse_buyin(text: &str) -> Option<f64> {
    classify_buyin(text).amount()
}

pub fn classify_buyin(text: &str) -> BuyinClass {
    let normalized = normalize(text);

    match evaluate(&normalized) {
        Some(total) if total > 0.0 => BuyinClass::Priced(total),
        Some(_) => BuyinClass::Free,
        None if mentions_free(&normalized) => BuyinClass::Free,
        None => BuyinClass::Unknown,
    }
}

/// Buy-in used for filtering and sorting. A pre-parsed amount always wins
/// over the display text; the text is only parsed when the amount is absent.
/// A non-finite amount counts as absent, matching how it reads back from JSON.
pub fn effective_buyin(record: &EventRecord) -> Option<f64> {
    match record.buyin_amount.filter(|amount| amount.is_finite()) {
        Some(amount) => positive(amount),
        None => record.buyin_text.as_deref().and_then(parse_buyin),
    }
}

fn positive(amount: f64) -> Option<f64> {
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

fn normalize(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !STRIPPED_GLYPHS.contains(c)).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn split_terms(text: &str) -> Vec<(Operator, &str)> {
    let mut terms = Vec::new();
    let mut operator = Operator::Add;
    let mut term_start = 0;

    for (index, c) in text.char_indices() {
        let next = match c {
            '+' => Operator::Add,
            '-' => Operator::Subtract,
            _ => continue,
        };
        terms.push((operator, &text[term_start..index]));
        operator = next;
        term_start = index + c.len_utf8();
    }
    terms.push((operator, &text[term_start..]));

    terms
}

fn parse_term(term: &str) -> Option<f64> {
    term.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Sum of the terms that parse; `None` when none do.
fn evaluate(text: &str) -> Option<f64> {
    split_terms(text)
        .into_iter()
        .filter_map(|(operator, term)| parse_term(term).map(|value| (operator, value)))
        .fold(None, |total, (operator, value)| {
            let total = total.unwrap_or(0.0);
            Some(match operator {
                Operator::Add => total + value,
                Operator::Subtract => total - value,
            })
        })
}

fn mentions_free(text: &str) -> bool {
    text.to_lowercase().contains("free")
}

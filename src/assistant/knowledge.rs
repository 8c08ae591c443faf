//! Offline answer bank used when no model is reachable

/// Prefix marking answers that did not come from a model
pub const OFFLINE_PREFIX: &str = "Offline mode: ";

/// Keyword and answer pairs, matched in this order
const KNOWLEDGE: [(&str, &str); 10] = [
    (
        "standard",
        "The Standard plan is free (0/month). It includes free instant transfers and fee-free currency exchange up to 1,000/month.",
    ),
    (
        "plus",
        "The Plus plan costs 3.99/month. It raises fee-free currency exchange to 3,000/month and adds priority support.",
    ),
    (
        "premium",
        "The Premium plan costs 9.99/month. It suits travellers: unlimited fee-free currency exchange, global medical insurance and cheaper international transfers.",
    ),
    (
        "metal",
        "The Metal plan costs 15.99/month. It adds card cashback, car rental excess insurance and an exclusive metal card.",
    ),
    (
        "ultra",
        "The Ultra plan costs 55/month (or 540/year). It is the top tier: unlimited airport lounge access, trip cancellation insurance and reduced investment fees.",
    ),
    (
        "travel",
        "For travel, Premium or Metal are the usual picks: both offer unlimited fee-free currency exchange and medical insurance. Metal adds car rental excess cover.",
    ),
    (
        "lounge",
        "Airport lounge access is discounted on Premium and Metal, but free and unlimited only on Ultra.",
    ),
    (
        "crypto",
        "Crypto fees vary by plan: Standard/Plus 1.49%, Premium/Metal 0.99%, Ultra 0.49%.",
    ),
    (
        "invest",
        "Stocks and ETFs are available on every plan. Ultra has the lowest trading fee at 0.12%.",
    ),
    (
        "insurance",
        "Medical insurance is included from Premium upwards and covers emergency medical costs abroad. Metal and Ultra add flight delay and baggage cover.",
    ),
];

const GENERIC_ANSWER: &str = "The assistant is unreachable right now, but plans range from 0 (Standard) to 55/month (Ultra). Try asking about 'Metal cost' or 'Premium benefits'.";

/// Deterministic answer for a query, from the first matching keyword
pub fn offline_answer(query: &str) -> String {
    let normalized = query.to_lowercase();
    let answer = KNOWLEDGE
        .iter()
        .find(|(keyword, _)| normalized.contains(keyword))
        .map(|(_, answer)| *answer)
        .unwrap_or(GENERIC_ANSWER);
    format!("{}{}", OFFLINE_PREFIX, answer)
}

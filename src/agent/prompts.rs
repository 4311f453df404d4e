// src/agent/prompts.rs
use crate::scrape::ScrapedDeal;

/// System instructions for the selection call.
pub const SYSTEM_INSTRUCTIONS: &str = r#"You pick and summarize the 5 deals with the most detailed descriptions from a list, favouring deals that have a thorough, high quality product description and an unambiguous price.
Respond only with JSON that matches the requested schema, with no commentary. Give the price as a number taken from the description. Leave out any deal whose price is unclear.
What matters most is returning the 5 deals with the richest product descriptions and a price. The terms of the deal are unimportant; a thorough description of the product is what counts.
Watch out for wording like "$XXX off" or "reduced by $XXX": that is a discount, not the price of the product. Only include a product when you are highly confident of its actual price.

Shape of the response:
{"deals": [
    {
        "product_description": "A clear 4-5 sentence summary of the product. The item's details matter far more than why the deal is good. Do not mention discounts or coupons; describe the item itself. One paragraph per chosen item.",
        "price": 99.99,
        "url": "the url exactly as provided"
    },
    ...
]}"#;

/// Text placed before the deal blocks in the user prompt.
pub const USER_PROMPT_PREFIX: &str = r#"Reply with the 5 most promising deals from the list below, choosing those with the most detailed, high quality product description and a clear price greater than 0.
Reply only with JSON. Rewrite each description as a summary of the product itself, not of the terms of the deal.
Remember to write a full paragraph in the product_description field for each of the 5 items you choose.
Watch out for wording like "$XXX off" or "reduced by $XXX": that is a discount, not the price of the product. Only include a product when you are highly confident of its actual price.

Deals:

"#;

/// Text placed after the deal blocks in the user prompt.
pub const USER_PROMPT_SUFFIX: &str = "\n\nReply strictly in JSON and include exactly 5 deals, no more.";

/// Every deal's `describe()` block, separated by a blank line.
pub fn deals_block(deals: &[ScrapedDeal]) -> String {
    deals
        .iter()
        .map(ScrapedDeal::describe)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_user_prompt(deals: &[ScrapedDeal]) -> String {
    format!("{USER_PROMPT_PREFIX}{}{USER_PROMPT_SUFFIX}", deals_block(deals))
}

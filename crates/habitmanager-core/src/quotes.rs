//! Daily inspirational quote.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

const fn q(text: &'static str, author: &'static str) -> Quote {
    Quote { text, author }
}

pub const QUOTES: &[Quote] = &[
    q("The only way to do great work is to love what you do.", "Steve Jobs"),
    q("Success is not final, failure is not fatal: it is the courage to continue that counts.", "Winston Churchill"),
    q("The future belongs to those who believe in the beauty of their dreams.", "Eleanor Roosevelt"),
    q("It is during our darkest moments that we must focus to see the light.", "Aristotle"),
    q("The only impossible journey is the one you never begin.", "Tony Robbins"),
    q("Your limitation is only your imagination.", "Unknown"),
    q("Push yourself, because no one else is going to do it for you.", "Unknown"),
    q("Great things never come from comfort zones.", "Unknown"),
    q("Dream it. Wish it. Do it.", "Unknown"),
    q("Success doesn't just find you. You have to go out and get it.", "Unknown"),
    q("The harder you work for something, the greater you'll feel when you achieve it.", "Unknown"),
    q("Don't stop when you're tired. Stop when you're done.", "Unknown"),
    q("Wake up with determination. Go to bed with satisfaction.", "Unknown"),
    q("Do something today that your future self will thank you for.", "Sean Patrick Flanery"),
    q("Little things make big days.", "Unknown"),
    q("It's going to be hard, but hard does not mean impossible.", "Unknown"),
    q("Don't wait for opportunity. Create it.", "Unknown"),
    q("Sometimes we're tested not to show our weaknesses, but to discover our strengths.", "Unknown"),
    q("The key to success is to focus on goals, not obstacles.", "Unknown"),
    q("Dream bigger. Do bigger.", "Unknown"),
    q("A year from now you may wish you had started today.", "Karen Lamb"),
    q("You are never too old to set another goal or to dream a new dream.", "C.S. Lewis"),
    q("The way to get started is to quit talking and begin doing.", "Walt Disney"),
    q("If you really look closely, most overnight successes took a long time.", "Steve Jobs"),
    q("The secret of getting ahead is getting started.", "Mark Twain"),
];

/// The quote for `date`. Stable for the whole day, rotating through the
/// table from one day to the next.
pub fn daily_quote(date: NaiveDate) -> Quote {
    let index = date.num_days_from_ce().rem_euclid(QUOTES.len() as i32) as usize;
    QUOTES[index]
}

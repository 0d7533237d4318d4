//! Section names owned by the analyst tasks

pub const MARKET: &str = "market";
pub const TECHNICAL: &str = "technical";
pub const FUNDAMENTALS: &str = "fundamentals";
pub const SENTIMENT: &str = "sentiment";
pub const NEWS: &str = "news";
pub const BULL: &str = "bull";
pub const BEAR: &str = "bear";
pub const SIGNAL: &str = "signal";
pub const RISK: &str = "risk";
pub const DECISION: &str = "decision";
pub const EXECUTION: &str = "execution";

//! Response Parser: pulls the tagged reasoning and move selector out of a reply.

use once_cell::sync::Lazy;
use regex::Regex;

static REASONING_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<reasoning>(.*?)</reasoning>").expect("valid regex"));
static MOVE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<move>(.*?)</move>").expect("valid regex"));

/// The two fields an agent is asked to return. Missing tags yield empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentReply {
    pub reasoning: String,
    pub selector: String,
}

pub fn parse_reply(response: &str) -> AgentReply {
    AgentReply {
        reasoning: first_tagged(&REASONING_TAG, response),
        selector: first_tagged(&MOVE_TAG, response),
    }
}

fn first_tagged(pattern: &Regex, text: &str) -> String {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_multiline_reasoning() {
        let reply = parse_reply(
            "Sure.\n<reasoning>\n  Control the centre.\n  Develop later.\n</reasoning>\n<move> 12 </move>",
        );
        assert_eq!(reply.reasoning, "Control the centre.\n  Develop later.");
        assert_eq!(reply.selector, "12");
    }

    #[test]
    fn test_first_match_is_non_greedy() {
        let reply = parse_reply("<move>3</move> or maybe <move>4</move>");
        assert_eq!(reply.selector, "3");
    }

    #[test]
    fn test_missing_tags_yield_empty_strings() {
        let reply = parse_reply("I think e4 is best.");
        assert_eq!(reply, AgentReply::default());
    }
}

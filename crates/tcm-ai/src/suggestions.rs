//! Suggested replies for the consultation.
//!
//! The model is asked to end each question with an `<OPTIONS>` block. When
//! it forgets, the question text is matched against a fixed rule list
//! (first match wins) and the rule's canned answers are offered instead.

use tcm_core::i18n::{self, Language, TextKey};

/// Reply text with the options block removed, plus the parsed options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub text: String,
    pub options: Vec<String>,
}

const OPEN_TAG: &str = "<OPTIONS>";
const CLOSE_TAG: &str = "</OPTIONS>";

/// Strip an `<OPTIONS>a, b, c</OPTIONS>` block out of a reply.
///
/// Tag matching is ASCII case-insensitive. A missing closing tag takes the
/// rest of the reply as the option list.
pub fn extract_options(reply: &str) -> ParsedReply {
    let upper = reply.to_ascii_uppercase();
    let Some(open) = upper.find(OPEN_TAG) else {
        return ParsedReply {
            text: reply.trim().to_string(),
            options: Vec::new(),
        };
    };

    let inner_start = open + OPEN_TAG.len();
    let (inner_end, rest_start) = match upper[inner_start..].find(CLOSE_TAG) {
        Some(close) => (inner_start + close, inner_start + close + CLOSE_TAG.len()),
        None => (reply.len(), reply.len()),
    };

    let options = reply[inner_start..inner_end]
        .split([',', '，', '、'])
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    let text = format!("{}{}", reply[..open].trim_end(), &reply[rest_start..])
        .trim()
        .to_string();

    ParsedReply { text, options }
}

struct Rule {
    name: &'static str,
    keywords: &'static [&'static str],
    options: &'static [TextKey],
}

const RULES: &[Rule] = &[
    Rule {
        name: "duration",
        keywords: &["how long", "when did", "since when", "多久", "多长时间", "什么时候开始"],
        options: &[
            TextKey::OptLessThanWeek,
            TextKey::OptOneToFourWeeks,
            TextKey::OptOneToSixMonths,
            TextKey::OptOverSixMonths,
        ],
    },
    Rule {
        name: "frequency",
        keywords: &["how often", "how frequently", "how many times", "frequency", "频率", "经常", "几次"],
        options: &[
            TextKey::OptDaily,
            TextKey::OptFewTimesWeek,
            TextKey::OptOccasionally,
            TextKey::OptRarely,
        ],
    },
    Rule {
        name: "severity",
        keywords: &["how severe", "how bad", "severity", "scale of", "intensity", "严重", "程度"],
        options: &[TextKey::OptMild, TextKey::OptModerate, TextKey::OptSevere],
    },
    Rule {
        name: "sleep",
        keywords: &["sleep", "insomnia", "dream", "睡", "梦"],
        options: &[
            TextKey::OptSleepWell,
            TextKey::OptHardToFallAsleep,
            TextKey::OptWakeOften,
            TextKey::OptVividDreams,
        ],
    },
    Rule {
        name: "diet",
        keywords: &["appetite", "diet", "eat", "food", "thirst", "食欲", "饮食", "吃", "口渴"],
        options: &[
            TextKey::OptNormalAppetite,
            TextKey::OptPoorAppetite,
            TextKey::OptPreferWarm,
            TextKey::OptPreferCold,
        ],
    },
    Rule {
        name: "stress",
        keywords: &["stress", "mood", "emotion", "anxious", "irritab", "压力", "情绪", "心情", "焦虑"],
        options: &[TextKey::OptLowStress, TextKey::OptSomeStress, TextKey::OptHighStress],
    },
    Rule {
        name: "yes_no",
        keywords: &[
            "do you", "are you", "have you", "did you", "is there", "does ", "can you", "吗", "是否",
            "有没有",
        ],
        options: &[TextKey::OptYes, TextKey::OptNo, TextKey::OptNotSure],
    },
];

const FALLBACK: &[TextKey] = &[
    TextKey::OptYes,
    TextKey::OptNo,
    TextKey::OptSometimes,
    TextKey::OptNotSure,
];

/// Canned replies for a question, localized.
pub fn suggest_replies(question: &str, lang: Language) -> Vec<String> {
    let (_, options) = matching_rule(question);
    options.iter().map(|&key| i18n::text(lang, key).to_string()).collect()
}

/// Name of the rule a question falls under (`"fallback"` when none match).
pub fn rule_name(question: &str) -> &'static str {
    matching_rule(question).0
}

fn matching_rule(question: &str) -> (&'static str, &'static [TextKey]) {
    let lower = question.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| contains_keyword(&lower, kw)))
        .map(|rule| (rule.name, rule.options))
        .unwrap_or(("fallback", FALLBACK))
}

/// ASCII keywords must start at a word boundary ("eat" matches "eating" but
/// not "sweat"). CJK keywords match anywhere.
fn contains_keyword(haystack: &str, keyword: &str) -> bool {
    if !keyword.is_ascii() {
        return haystack.contains(keyword);
    }
    haystack.match_indices(keyword).any(|(idx, _)| {
        haystack[..idx]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric())
    })
}

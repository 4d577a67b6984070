//! Shared constants used across the application

use std::time::Duration;

pub const DEFAULT_CHAT_ENDPOINT: &str = "http://localhost:5000/api/chat";
pub const DEFAULT_HEALTH_ENDPOINT: &str = "http://localhost:5000/api/health";

pub const CHAT_ENDPOINT_ENV: &str = "ADMISSIONS_CHAT_URL";
pub const HEALTH_ENDPOINT_ENV: &str = "ADMISSIONS_HEALTH_URL";

pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(30_000);
pub const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_millis(5_000);
pub const HEALTH_POLL_INTERVAL: Duration = Duration::from_millis(45_000);
pub const LAST_RESPONSE_TTL: Duration = Duration::from_millis(3_000);

/// Appended as a normal assistant reply when the backend answered with JSON
/// that carries no usable text.
pub const FALLBACK_REPLY: &str = "I apologize, but I couldn't generate a response at the moment. Please try again or rephrase your question.";

/// Appended when the round trip failed for any reason other than cancellation.
pub const TECHNICAL_DIFFICULTY_NOTICE: &str = "I'm experiencing technical difficulties connecting to the IBM Granite AI model. Please try again in a moment or contact our admissions office directly.";

/// Longest input the compose line accepts, in characters.
pub const MAX_INPUT_CHARS: usize = 2_000;

pub const APP_TITLE: &str = "AdmissionAI Pro";
pub const APP_TAGLINE: &str = "Powered by IBM Granite AI";

/// Prompts offered under an empty input line.
pub const QUICK_SUGGESTIONS: [&str; 4] = [
    "What are the admission requirements?",
    "Help me with my essay",
    "Scholarship opportunities",
    "Application deadlines",
];

pub struct QuickAction {
    pub label: &'static str,
    pub prompt: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 8] = [
    QuickAction {
        label: "Admission Requirements",
        prompt: "What are the admission requirements for Computer Science programs?",
    },
    QuickAction {
        label: "Essay Writing Help",
        prompt: "Help me write a compelling personal statement for my college application.",
    },
    QuickAction {
        label: "Scholarship Search",
        prompt: "What scholarship opportunities are available for international students?",
    },
    QuickAction {
        label: "Cost Calculator",
        prompt: "Help me calculate the total cost of college including tuition, housing, and expenses.",
    },
    QuickAction {
        label: "Application Deadlines",
        prompt: "What are the important application deadlines I need to know?",
    },
    QuickAction {
        label: "College Selection",
        prompt: "Help me choose the right colleges based on my interests and qualifications.",
    },
    QuickAction {
        label: "Financial Aid",
        prompt: "What financial aid options are available and how do I apply?",
    },
    QuickAction {
        label: "Test Preparation",
        prompt: "How should I prepare for standardized tests like SAT, ACT, or GRE?",
    },
];

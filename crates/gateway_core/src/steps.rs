use std::cmp::Reverse;

/// One stage of backend processing, recognized by a phrase in push messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    pub id: u8,
    pub match_phrase: &'static str,
    pub display_name: &'static str,
    pub display_description: &'static str,
}

pub const TOTAL_STEPS: u8 = 4;

/// Ordered by `id`, no gaps.
pub const STEPS: [StepDefinition; TOTAL_STEPS as usize] = [
    StepDefinition {
        id: 1,
        match_phrase: "in upload processing lambda",
        display_name: "Uploading file",
        display_description: "Transferring your package to our servers",
    },
    StepDefinition {
        id: 2,
        match_phrase: "in content processing lambda",
        display_name: "Extracting content",
        display_description: "Unpacking and analyzing your Articulate package",
    },
    StepDefinition {
        id: 3,
        match_phrase: "zip extracted and successfully processed",
        display_name: "Processing content",
        display_description: "Converting and optimizing your content",
    },
    StepDefinition {
        id: 4,
        match_phrase: "in step3 lambda",
        display_name: "Finalizing",
        display_description: "Preparing your content for the testbench",
    },
];

/// Classifies a push message. Phrases are tried longest first and the first one
/// contained in the message (case-insensitive) wins, so a message quoting two
/// phrases resolves the same way every time.
pub fn match_step(message: &str) -> Option<&'static StepDefinition> {
    let haystack = message.to_lowercase();
    let mut ordered: Vec<&'static StepDefinition> = STEPS.iter().collect();
    ordered.sort_by_key(|step| (Reverse(step.match_phrase.len()), step.id));
    ordered
        .into_iter()
        .find(|step| haystack.contains(&step.match_phrase.to_lowercase()))
}

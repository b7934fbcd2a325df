//! Built-in discourses offered by the demo.

use serde::Serialize;

/// A discourse the user can load with one click.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SampleDiscourse {
    pub name: &'static str,
    pub description: &'static str,
    pub text: &'static str,
}

pub static SAMPLE_DISCOURSES: &[SampleDiscourse] = &[
    SampleDiscourse {
        name: "Driving test",
        description: "Pronouns shifting between two people",
        text: "John has been acting quite odd. He called up Mike yesterday. \
               Mike was studying for his driver's test. He was annoyed by John's call.",
    },
    SampleDiscourse {
        name: "Ball toss",
        description: "An object passed along a chain of people",
        text: "Jill caught a ball. She tossed it to John. He caught it while in the air.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use centering_view::InputLimits;

    #[test]
    fn test_samples_pass_default_limits() {
        for sample in SAMPLE_DISCOURSES {
            let utterances = InputLimits::default()
                .validate(sample.text)
                .unwrap_or_else(|e| panic!("{}: {}", sample.name, e));
            assert!(utterances.len() >= 3, "{}", sample.name);
        }
    }
}

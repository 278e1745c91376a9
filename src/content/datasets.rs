//! Fixed challenge datasets for phases 2 through 5.
//!
//! Content is baked into the binary; only the projections in the DTO layer
//! ever leave the process, and those strip the correctness keys.

use super::{ChoiceItem, DebugChallenge, RiddleItem};

/// Canonical free-text answer to the debugging challenge.
pub const DEBUG_ANSWER: &str = "twenty five";
/// Short numeric alias accepted in place of [`DEBUG_ANSWER`].
pub const DEBUG_ANSWER_ALIAS: &str = "25";

pub(super) static QUIZ_ITEMS: [ChoiceItem; 5] = [
    ChoiceItem {
        id: 1,
        code: None,
        question: "In which year was the very first VU campus scavenger hunt held?",
        options: &["1999", "2025", "2038", "2050"],
        correct: 1,
    },
    ChoiceItem {
        id: 2,
        code: None,
        question: "Which landmark marks the northern edge of the hunt area?",
        options: &[
            "The clock tower",
            "The botanical dome",
            "The tram depot",
            "The old library",
        ],
        correct: 0,
    },
    ChoiceItem {
        id: 3,
        code: None,
        question: "How many challenge phases does a team clear before the final location proof?",
        options: &["Three", "Four", "Five", "Six"],
        correct: 2,
    },
    ChoiceItem {
        id: 4,
        code: None,
        question: "What does the hunt motto \"per aspera ad astra\" translate to?",
        options: &[
            "Through hardships to the stars",
            "Seize the day",
            "Fortune favours the bold",
            "Knowledge is power",
        ],
        correct: 0,
    },
    ChoiceItem {
        id: 5,
        code: None,
        question: "Which colour lights the finish beacon once a team checks in?",
        options: &["Red", "Teal", "Amber", "Violet"],
        correct: 3,
    },
];

pub(super) static CODE_QUIZ_ITEMS: [ChoiceItem; 5] = [
    ChoiceItem {
        id: 1,
        code: Some(
            "let mut total = 0;\nfor n in [2, 4, 6] {\n    total += n;\n}\nprintln!(\"{total}\");",
        ),
        question: "What does this program print?",
        options: &["6", "12", "8", "24"],
        correct: 1,
    },
    ChoiceItem {
        id: 2,
        code: Some("let word = \"hunt\";\nprintln!(\"{}\", word.len() * 2);"),
        question: "What does this program print?",
        options: &["4", "6", "8", "16"],
        correct: 2,
    },
    ChoiceItem {
        id: 3,
        code: Some(
            "let v = vec![1, 2, 3];\nlet out: Vec<i32> = v.iter().map(|n| n * n).collect();\nprintln!(\"{out:?}\");",
        ),
        question: "What does this program print?",
        options: &["[1, 2, 3]", "[1, 4, 9]", "[2, 4, 6]", "[3, 2, 1]"],
        correct: 1,
    },
    ChoiceItem {
        id: 4,
        code: Some("let x = 5;\nlet x = x + 1;\nlet x = x * 2;\nprintln!(\"{x}\");"),
        question: "Each `let` shadows the previous binding. What is printed?",
        options: &["12", "6", "5", "10"],
        correct: 0,
    },
    ChoiceItem {
        id: 5,
        code: Some("let s = String::from(\"VU\");\nlet t = s + \"2050\";\nprintln!(\"{}\", t.len());"),
        question: "What does this program print?",
        options: &["2", "4", "6", "8"],
        correct: 2,
    },
];

pub(super) static DEBUG_CHALLENGE: DebugChallenge = DebugChallenge {
    id: 1,
    code: "fn stray_sum() -> i32 {\n    let mut total = 0;\n    let mut n = 1;\n    while n <= 10 {\n        total += n;\n        n += 2;\n    }\n    total\n}",
    question: "This function was meant to add every number from 1 to 10, but a stray \
               increment slipped in. What does it actually return? Answer in words or digits.",
};

pub(super) static RIDDLE_ITEMS: [RiddleItem; 4] = [
    RiddleItem {
        id: "keys",
        riddle: "I have keys but open no locks, space but no room, and you can enter but not go in. What am I?",
        accepted: &["keyboard", "a keyboard"],
    },
    RiddleItem {
        id: "cities",
        riddle: "I have cities but no houses, forests but no trees, and water but no fish. What am I?",
        accepted: &["map", "a map"],
    },
    RiddleItem {
        id: "footsteps",
        riddle: "The more you take, the more you leave behind. What am I?",
        accepted: &["footsteps", "steps", "footprints"],
    },
    RiddleItem {
        id: "echo",
        riddle: "I speak without a mouth and hear without ears. I come alive with wind. What am I?",
        accepted: &["echo", "an echo"],
    },
];

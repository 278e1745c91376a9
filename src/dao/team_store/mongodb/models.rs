use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{
    DebugRecord, LocationRecord, PhaseLedger, PromptRecord, QuizRecord, RiddleRecord, TeamEntity,
    TeamPatch, Theme,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoTeamDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    name: String,
    leader: String,
    members: Vec<String>,
    email: String,
    theme: Theme,
    current_phase: u8,
    #[serde(default)]
    progress: PhaseLedger,
    registered_at: DateTime,
    updated_at: DateTime,
}

impl From<TeamEntity> for MongoTeamDocument {
    fn from(value: TeamEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            leader: value.leader,
            members: value.members,
            email: value.email,
            theme: value.theme,
            current_phase: value.current_phase,
            progress: value.progress,
            registered_at: DateTime::from_system_time(value.registered_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoTeamDocument> for TeamEntity {
    fn from(value: MongoTeamDocument) -> Self {
        Self {
            id: value.id,
            name: value.name,
            leader: value.leader,
            members: value.members,
            email: value.email,
            theme: value.theme,
            current_phase: value.current_phase,
            progress: value.progress,
            registered_at: value.registered_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}

fn prompt_doc(record: &PromptRecord) -> Document {
    doc! { "completed": record.completed, "ai_prompt": record.ai_prompt.clone() }
}

fn quiz_doc(record: &QuizRecord) -> Document {
    doc! {
        "completed": record.completed,
        "score": record.score.map(i64::from),
        "total": record.total.map(i64::from),
    }
}

fn debug_doc(record: &DebugRecord) -> Document {
    doc! { "completed": record.completed, "answer": record.answer.clone() }
}

fn riddle_doc(record: &RiddleRecord) -> Document {
    doc! {
        "completed": record.completed,
        "score": record.score.map(i64::from),
        "total": record.total.map(i64::from),
    }
}

fn location_doc(record: &LocationRecord) -> Document {
    doc! { "completed": record.completed, "answer": record.answer.clone() }
}

/// Flatten a [`TeamPatch`] into the dot-path `$set` document of a single
/// `update_one`, so the whole merge commits atomically. Untouched sibling
/// fields are never named and therefore never clobbered.
pub fn patch_set_document(patch: &TeamPatch) -> Document {
    let mut set = Document::new();
    if let Some(phase) = patch.current_phase {
        set.insert("current_phase", i32::from(phase));
    }
    if let Some(record) = &patch.prompt {
        set.insert("progress.prompt", prompt_doc(record));
    }
    if let Some(record) = &patch.quiz {
        set.insert("progress.quiz", quiz_doc(record));
    }
    if let Some(record) = &patch.code_quiz {
        set.insert("progress.code_quiz", quiz_doc(record));
    }
    if let Some(record) = &patch.debug {
        set.insert("progress.debug", debug_doc(record));
    }
    if let Some(record) = &patch.riddles {
        set.insert("progress.riddles", riddle_doc(record));
    }
    if let Some(record) = &patch.location {
        set.insert("progress.location", location_doc(record));
    }
    set.insert("updated_at", DateTime::now());
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_flattens_only_touched_fields() {
        let patch = TeamPatch {
            current_phase: Some(3),
            quiz: Some(QuizRecord {
                completed: true,
                score: Some(5),
                total: Some(5),
            }),
            ..TeamPatch::default()
        };

        let set = patch_set_document(&patch);
        assert!(set.contains_key("current_phase"));
        assert!(set.contains_key("progress.quiz"));
        assert!(set.contains_key("updated_at"));
        assert!(!set.contains_key("progress.prompt"));
        assert!(!set.contains_key("progress.code_quiz"));
    }
}

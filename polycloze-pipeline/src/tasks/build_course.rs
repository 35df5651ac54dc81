//! `BuildCourse(l1, l2)`: Phases B and C of the Course Assembler.

use std::path::PathBuf;
use std::sync::Arc;

use polycloze_scheduler::{Task, TaskId};

use crate::assembler::assemble_course;
use crate::pairing::canonical;
use crate::paths::BuildPaths;

pub struct BuildCourseTask {
    pub l1: String,
    pub l2: String,
    pub paths: Arc<BuildPaths>,
    pub max_examples: usize,
}

impl Task for BuildCourseTask {
    fn id(&self) -> TaskId {
        TaskId::BuildCourse(self.l1.clone(), self.l2.clone())
    }

    fn inputs(&self) -> Vec<PathBuf> {
        let (lo, hi) = canonical(&self.l1, &self.l2);
        vec![
            self.paths.difficulty_sentences_db(&self.l1, &self.l2),
            self.paths.difficulty_words_db(&self.l1, &self.l2),
            self.paths.language_sentences_csv(&self.l1),
            self.paths.pair_links_csv(lo, hi),
        ]
    }

    fn outputs(&self) -> Vec<PathBuf> {
        vec![self.paths.course_db(&self.l1, &self.l2)]
    }

    fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        assemble_course(&self.l1, &self.l2, &self.paths, self.max_examples)?;
        Ok(())
    }
}

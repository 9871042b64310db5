use std::collections::BTreeMap;

use crate::core::alignment::AlignmentResult;
use crate::core::report::Report;
use crate::core::sequence::SequenceRecord;
use crate::core::snapshot::{
    sort_key, AlignmentEntry, ReportEntry, SequenceEntry, SnapshotError, TableEntry,
    WorkspaceSnapshot,
};
use crate::core::table::Table;
use crate::core::types::Category;
use crate::utils::validation::is_valid_name;

/// Any entity the workspace can hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Sequence(SequenceRecord),
    Alignment(AlignmentResult),
    Table(Table),
    Report(Report),
}

impl Entity {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Sequence(s) => &s.name,
            Self::Alignment(a) => &a.name,
            Self::Table(t) => &t.name,
            Self::Report(r) => &r.name,
        }
    }

    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            Self::Sequence(_) => Category::Sequence,
            Self::Alignment(_) => Category::Alignment,
            Self::Table(_) => Category::Table,
            Self::Report(_) => Category::Report,
        }
    }
}

/// The single mutable aggregate of one session.
///
/// Names are unique within a category. Mutation is crate-private: front ends
/// go through the dispatcher and only ever read snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workspace {
    sequences: BTreeMap<String, SequenceRecord>,
    alignments: BTreeMap<String, AlignmentResult>,
    tables: BTreeMap<String, Table>,
    reports: BTreeMap<String, Report>,
    history: Vec<String>,
}

impl Workspace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sequence(&self, name: &str) -> Option<&SequenceRecord> {
        self.sequences.get(name)
    }

    #[must_use]
    pub fn alignment(&self, name: &str) -> Option<&AlignmentResult> {
        self.alignments.get(name)
    }

    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    #[must_use]
    pub fn report(&self, name: &str) -> Option<&Report> {
        self.reports.get(name)
    }

    pub fn sequences(&self) -> impl Iterator<Item = &SequenceRecord> {
        self.sequences.values()
    }

    pub fn alignments(&self) -> impl Iterator<Item = &AlignmentResult> {
        self.alignments.values()
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn reports(&self) -> impl Iterator<Item = &Report> {
        self.reports.values()
    }

    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    #[must_use]
    pub fn contains(&self, category: Category, name: &str) -> bool {
        match category {
            Category::Sequence => self.sequences.contains_key(name),
            Category::Alignment => self.alignments.contains_key(name),
            Category::Table => self.tables.contains_key(name),
            Category::Report => self.reports.contains_key(name),
        }
    }

    /// Every category holding `name`, in declaration order
    #[must_use]
    pub fn categories_of(&self, name: &str) -> Vec<Category> {
        [
            Category::Sequence,
            Category::Alignment,
            Category::Table,
            Category::Report,
        ]
        .into_iter()
        .filter(|c| self.contains(*c, name))
        .collect()
    }

    /// Total number of entities across categories
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len() + self.alignments.len() + self.tables.len() + self.reports.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn insert(&mut self, entity: Entity) {
        match entity {
            Entity::Sequence(s) => {
                self.sequences.insert(s.name.clone(), s);
            }
            Entity::Alignment(a) => {
                self.alignments.insert(a.name.clone(), a);
            }
            Entity::Table(t) => {
                self.tables.insert(t.name.clone(), t);
            }
            Entity::Report(r) => {
                self.reports.insert(r.name.clone(), r);
            }
        }
    }

    pub(crate) fn record_activity(&mut self, line: impl Into<String>) {
        self.history.push(line.into());
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Detect internal corruption. An empty result means the workspace is sound.
    #[must_use]
    pub fn check_invariants(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for (key, record) in &self.sequences {
            if key != &record.name {
                problems.push(format!("sequence key '{key}' holds '{}'", record.name));
            }
            if let Err(e) = record.validate() {
                problems.push(format!("sequence '{key}': {e}"));
            }
        }
        for (key, alignment) in &self.alignments {
            if key != &alignment.name {
                problems.push(format!("alignment key '{key}' holds '{}'", alignment.name));
            }
            if alignment.members.is_empty() {
                problems.push(format!("alignment '{key}' has no members"));
            }
        }
        for (key, table) in &self.tables {
            if key != &table.name {
                problems.push(format!("table key '{key}' holds '{}'", table.name));
            }
            if let Err(e) = table.validate() {
                problems.push(format!("table '{key}': {e}"));
            }
        }
        for (key, report) in &self.reports {
            if key != &report.name {
                problems.push(format!("report key '{key}' holds '{}'", report.name));
            }
        }

        let keys = self
            .sequences
            .keys()
            .chain(self.alignments.keys())
            .chain(self.tables.keys())
            .chain(self.reports.keys());
        for key in keys.filter(|key| !is_valid_name(key)) {
            problems.push(format!("invalid entity name {key:?}"));
        }

        problems
    }

    /// Serializable projection, each collection sorted case-insensitively by name
    #[must_use]
    pub fn snapshot(&self) -> WorkspaceSnapshot {
        let mut sequences: Vec<SequenceEntry> = self.sequences.values().map(Into::into).collect();
        let mut alignments: Vec<AlignmentEntry> =
            self.alignments.values().map(Into::into).collect();
        let mut tables: Vec<TableEntry> = self.tables.values().map(Into::into).collect();
        let mut reports: Vec<ReportEntry> = self.reports.values().map(Into::into).collect();

        sequences.sort_by_cached_key(|e| sort_key(&e.name));
        alignments.sort_by_cached_key(|e| sort_key(&e.name));
        tables.sort_by_cached_key(|e| sort_key(&e.name));
        reports.sort_by_cached_key(|e| sort_key(&e.name));

        WorkspaceSnapshot {
            sequences,
            alignments,
            tables,
            reports,
            history: self.history.clone(),
        }
    }

    /// Rebuild a workspace from a snapshot, validating every entity.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if any entity breaks a workspace invariant.
    pub fn from_snapshot(snapshot: WorkspaceSnapshot) -> Result<Self, SnapshotError> {
        let mut workspace = Self::new();

        for entry in snapshot.sequences {
            let record = SequenceRecord::try_from(entry)?;
            workspace.insert_unique(Entity::Sequence(record))?;
        }
        for entry in snapshot.alignments {
            workspace.insert_unique(Entity::Alignment(entry.into()))?;
        }
        for entry in snapshot.tables {
            let table = Table::try_from(entry)?;
            workspace.insert_unique(Entity::Table(table))?;
        }
        for entry in snapshot.reports {
            workspace.insert_unique(Entity::Report(entry.into()))?;
        }
        workspace.history = snapshot.history;

        Ok(workspace)
    }

    fn insert_unique(&mut self, entity: Entity) -> Result<(), SnapshotError> {
        if self.contains(entity.category(), entity.name()) {
            return Err(SnapshotError::Duplicate {
                category: entity.category(),
                name: entity.name().to_string(),
            });
        }
        self.insert(entity);
        Ok(())
    }
}

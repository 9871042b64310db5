/// A stored alignment: display rows, score and the sequences it was built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentResult {
    pub name: String,

    /// Pairwise: aligned A, match ribbon, aligned B. Group: one row per member.
    pub lines: Vec<String>,

    pub score: i64,

    /// Input sequence names, in the order they were aligned
    pub members: Vec<String>,

    /// Method label (`global`, `local`, or the group aligner's name)
    pub method: String,
}

impl AlignmentResult {
    pub fn new(
        name: impl Into<String>,
        lines: Vec<String>,
        score: i64,
        members: Vec<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            lines,
            score,
            members,
            method: method.into(),
        }
    }
}

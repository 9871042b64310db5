use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use noodles::fasta;

use crate::core::sequence::SequenceRecord;
use crate::export::{ensure_parent, ExportError};

/// Write `records` as FASTA; descriptions go after the name on the header line
pub fn write_fasta(path: &Path, records: &[&SequenceRecord]) -> Result<(), ExportError> {
    ensure_parent(path)?;
    let mut writer = fasta::io::Writer::new(BufWriter::new(File::create(path)?));

    for record in records {
        let description = (!record.description.is_empty())
            .then(|| record.description.clone().into());
        let definition = fasta::record::Definition::new(record.name.clone(), description);
        let sequence = fasta::record::Sequence::from(record.as_bytes().to_vec());
        writer.write_record(&fasta::Record::new(definition, sequence))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Alphabet;
    use crate::parsing::{load_path, FileFormat, Loaded};

    #[test]
    fn test_fasta_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/seqs.fa");
        let a = SequenceRecord::new("a", Alphabet::Dna, "ACGT")
            .unwrap()
            .with_description("first");
        let b = SequenceRecord::new("b", Alphabet::Dna, "GGCC").unwrap();

        write_fasta(&path, &[&a, &b]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(">a first\nACGT\n"));

        let Loaded::Sequences { records, .. } = load_path(&path, FileFormat::Fasta).unwrap() else {
            panic!("expected sequences");
        };
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].residues, "GGCC");
    }
}

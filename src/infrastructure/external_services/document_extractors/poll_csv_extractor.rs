use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;
use tracing::warn;

use crate::application::ports::PollSource;
use crate::application::ports::poll_source::PollSourceError;
use crate::domain::entities::PollResult;

const INPUT_DATE_FORMAT: &str = "%d.%m.%Y";
const OUTPUT_DATE_FORMAT: &str = "%Y/%m/%d";

// Column positions: date, CDU, SPD, FDP, Grüne, Linke, AfD, (unused), others.
const DATE: usize = 0;
const CDU: usize = 1;
const SPD: usize = 2;
const FDP: usize = 3;
const GREENS: usize = 4;
const LEFT: usize = 5;
const AFD: usize = 6;
const OTHERS: usize = 8;

/// Party names in storage order with the column holding their share.
const PARTIES: [(&str, usize); 7] = [
    ("AfD", AFD),
    ("Bündnis 90/Die Grünen", GREENS),
    ("CDU", CDU),
    ("Die Linken", LEFT),
    ("FDP", FDP),
    ("SPD", SPD),
    ("Andere", OTHERS),
];

/// Reads semicolon separated polling tables with one header row.
pub struct PollCsvExtractor;

impl PollCsvExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn parse<R: Read>(&self, reader: R) -> Result<Vec<PollResult>, PollSourceError> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut results = Vec::new();
        for (line, record) in csv_reader.records().enumerate() {
            let record = record.map_err(|e| PollSourceError::MalformedFile(e.to_string()))?;
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }
            match parse_record(&record) {
                Some(rows) => results.extend(rows),
                None => warn!(row = line + 1, record = ?record, "Skipping unreadable poll row"),
            }
        }

        Ok(results)
    }
}

impl Default for PollCsvExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PollSource for PollCsvExtractor {
    fn read_poll_results(&self, path: &Path) -> Result<Vec<PollResult>, PollSourceError> {
        let file = std::fs::File::open(path)
            .map_err(|e| PollSourceError::IoError(format!("{}: {}", path.display(), e)))?;
        self.parse(file)
    }
}

fn parse_record(record: &StringRecord) -> Option<Vec<PollResult>> {
    if record.len() <= OTHERS {
        return None;
    }

    let poll_date = NaiveDate::parse_from_str(record.get(DATE)?, INPUT_DATE_FORMAT)
        .ok()?
        .format(OUTPUT_DATE_FORMAT)
        .to_string();

    Some(
        PARTIES
            .iter()
            .map(|(party, column)| {
                let result = record.get(*column).map(parse_german_number).unwrap_or(0.0);
                PollResult::new(poll_date.clone(), party.to_string(), result)
            })
            .collect(),
    )
}

/// Parses the leading number of a German formatted cell (`1.234,5`); anything unreadable is 0.0.
pub fn parse_german_number(cell: &str) -> f64 {
    let cleaned = cell.replace('"', "");
    let cleaned = cleaned.trim();

    let prefix_len = cleaned
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || *c == '.' || *c == ',' || (*i == 0 && *c == '-'))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);

    cleaned[..prefix_len]
        .replace('.', "")
        .replace(',', ".")
        .parse::<f64>()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const POLLS: &str = "Datum;CDU/CSU;SPD;FDP;Grüne;Linke;AfD;FW;Sonstige\n\
        01.03.2022;27,5;25;9;\"16,5\";5;10;2;7\n\
        \n\
        15.02.2022;28;24,5;-;16;5,5;11;2;\"n.a.\"\n";

    fn result_of<'a>(results: &'a [PollResult], date: &str, party: &str) -> &'a PollResult {
        results
            .iter()
            .find(|r| r.poll_date() == date && r.party() == party)
            .unwrap()
    }

    #[test]
    fn test_each_row_expands_to_seven_parties() {
        let results = PollCsvExtractor::new().parse(POLLS.as_bytes()).unwrap();

        assert_eq!(results.len(), 14);
        let parties: Vec<&str> = results[..7].iter().map(|r| r.party()).collect();
        assert_eq!(
            parties,
            vec!["AfD", "Bündnis 90/Die Grünen", "CDU", "Die Linken", "FDP", "SPD", "Andere"]
        );
        assert_eq!(result_of(&results, "2022/03/01", "CDU").result(), 27.5);
        assert_eq!(result_of(&results, "2022/03/01", "Bündnis 90/Die Grünen").result(), 16.5);
        assert_eq!(result_of(&results, "2022/03/01", "Andere").result(), 7.0);
    }

    #[test]
    fn test_unparsable_numbers_become_zero() {
        let results = PollCsvExtractor::new().parse(POLLS.as_bytes()).unwrap();

        assert_eq!(result_of(&results, "2022/02/15", "FDP").result(), 0.0);
        assert_eq!(result_of(&results, "2022/02/15", "Andere").result(), 0.0);
        assert_eq!(result_of(&results, "2022/02/15", "SPD").result(), 24.5);
    }

    #[test]
    fn test_row_with_bad_date_is_skipped() {
        let csv = "Datum;CDU;SPD;FDP;Grüne;Linke;AfD;FW;Sonstige\n\
            2022-03-01;27;25;9;16;5;10;2;7\n\
            02.03.2022;27;25;9;16;5;10;2;7\n";

        let results = PollCsvExtractor::new().parse(csv.as_bytes()).unwrap();

        assert_eq!(results.len(), 7);
        assert!(results.iter().all(|r| r.poll_date() == "2022/03/02"));
    }

    #[test]
    fn test_german_number_prefixes() {
        assert_eq!(parse_german_number("12,5"), 12.5);
        assert_eq!(parse_german_number(" \"3,0\" "), 3.0);
        assert_eq!(parse_german_number("1.234,5"), 1234.5);
        assert_eq!(parse_german_number("7%"), 7.0);
        assert_eq!(parse_german_number("-"), 0.0);
        assert_eq!(parse_german_number(""), 0.0);
    }

    #[test]
    fn test_reads_poll_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(POLLS.as_bytes()).unwrap();

        let results = PollCsvExtractor::new().read_poll_results(file.path()).unwrap();

        assert_eq!(results.len(), 14);
    }
}

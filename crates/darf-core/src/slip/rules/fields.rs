//! Numbered slip fields and the per-block accumulator.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::amounts::parse_brl_amount;
use super::patterns::FIELD_LINE;
use crate::models::payment::PaymentRecord;

/// The ten numbered boxes of a DARF slip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlipField {
    /// 01 - payer name.
    Name,
    /// 02 - assessment period.
    Period,
    /// 03 - CPF/CNPJ.
    TaxId,
    /// 04 - revenue code.
    RevenueCode,
    /// 05 - reference number.
    Reference,
    /// 06 - due date.
    DueDate,
    /// 07 - principal.
    Principal,
    /// 08 - penalty.
    Penalty,
    /// 09 - interest and charges.
    Interest,
    /// 10 - total.
    Total,
}

impl SlipField {
    /// Look up a field by its printed code ("1", "01", ..., "10").
    pub fn from_code(code: &str) -> Option<Self> {
        match format!("{:0>2}", code).as_str() {
            "01" => Some(Self::Name),
            "02" => Some(Self::Period),
            "03" => Some(Self::TaxId),
            "04" => Some(Self::RevenueCode),
            "05" => Some(Self::Reference),
            "06" => Some(Self::DueDate),
            "07" => Some(Self::Principal),
            "08" => Some(Self::Penalty),
            "09" => Some(Self::Interest),
            "10" => Some(Self::Total),
            _ => None,
        }
    }

    /// Two-digit code printed on the slip.
    pub fn code(self) -> &'static str {
        match self {
            Self::Name => "01",
            Self::Period => "02",
            Self::TaxId => "03",
            Self::RevenueCode => "04",
            Self::Reference => "05",
            Self::DueDate => "06",
            Self::Principal => "07",
            Self::Penalty => "08",
            Self::Interest => "09",
            Self::Total => "10",
        }
    }

    /// Labels printed next to the code, longest first.
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            Self::Name => &["NOME / TELEFONE", "NOME"],
            Self::Period => &["PERÍODO DE APURAÇÃO", "PERIODO DE APURACAO"],
            Self::TaxId => &["NÚMERO DO CPF OU CNPJ", "NUMERO DO CPF OU CNPJ", "CPF OU CNPJ", "CNPJ", "CPF"],
            Self::RevenueCode => &["CÓDIGO DA RECEITA", "CODIGO DA RECEITA"],
            Self::Reference => &["NÚMERO DE REFERÊNCIA", "NUMERO DE REFERENCIA"],
            Self::DueDate => &["DATA DE VENCIMENTO"],
            Self::Principal => &["VALOR DO PRINCIPAL"],
            Self::Penalty => &["VALOR DA MULTA"],
            Self::Interest => &["VALOR DOS JUROS E/OU ENCARGOS", "VALOR DOS JUROS"],
            Self::Total => &["VALOR TOTAL"],
        }
    }

    /// Byte length of the known label that starts `label`, if any.
    ///
    /// Case and whitespace are ignored; the match must end at a word boundary.
    fn known_label_len(self, label: &str) -> Option<usize> {
        self.labels()
            .iter()
            .find_map(|known| label_prefix_len(label, known))
    }

    /// Whether the value is a monetary amount.
    pub fn is_amount(self) -> bool {
        matches!(
            self,
            Self::Principal | Self::Penalty | Self::Interest | Self::Total
        )
    }
}

/// A normalized line recognized as a numbered field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedField<'a> {
    pub field: SlipField,
    pub label: &'a str,
    pub value: &'a str,
}

/// Recognize a numbered field line such as "07 VALOR DO PRINCIPAL 1.500,00".
///
/// The value may be empty when the slip prints it on the following line.
///
/// A label that runs past the known wording of the field ("01 NOME ACME
/// LTDA") is cut there and the rest of the line becomes the value.
pub fn tag_field(line: &str) -> Option<TaggedField<'_>> {
    let caps = FIELD_LINE.captures(line)?;
    let field = SlipField::from_code(&caps[1])?;
    let label = caps.get(2)?;
    let value = caps.get(3).map(|m| m.as_str().trim()).unwrap_or_default();

    let (label, value) = match field.known_label_len(label.as_str()) {
        Some(len) if !label.as_str()[len..].trim().is_empty() => {
            let rest = line[label.start() + len..].trim_start();
            let rest = rest.strip_prefix([':', '-']).unwrap_or(rest);
            (label.as_str()[..len].trim(), rest.trim())
        }
        _ => (label.as_str().trim(), value),
    };

    Some(TaggedField {
        field,
        label,
        value,
    })
}

/// Length of `label`'s prefix spelling `known`, or `None`.
fn label_prefix_len(label: &str, known: &str) -> Option<usize> {
    let mut rest = label;

    for expected in known.chars().filter(|c| !c.is_whitespace()) {
        rest = rest.trim_start();
        let mut chars = rest.chars();
        let actual = chars.next()?;
        if !actual.to_uppercase().eq(expected.to_uppercase()) {
            return None;
        }
        rest = chars.as_str();
    }

    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(label.len() - rest.len())
    } else {
        None
    }
}

/// Field values collected for one slip so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlipDraft {
    pub name: String,
    pub period: String,
    pub tax_id: String,
    pub revenue_code: String,
    pub reference: String,
    pub due_date: String,
    pub principal: Decimal,
    pub penalty: Decimal,
    pub interest: Decimal,
    pub total: Decimal,
}

impl SlipDraft {
    /// Store a value; a repeated field replaces the earlier value.
    pub fn set(&mut self, field: SlipField, value: &str) {
        match field {
            SlipField::Name => self.name = value.to_string(),
            SlipField::Period => self.period = value.to_string(),
            SlipField::TaxId => self.tax_id = value.to_string(),
            SlipField::RevenueCode => self.revenue_code = value.to_string(),
            SlipField::Reference => self.reference = value.to_string(),
            SlipField::DueDate => self.due_date = value.to_string(),
            SlipField::Principal => self.principal = parse_brl_amount(value),
            SlipField::Penalty => self.penalty = parse_brl_amount(value),
            SlipField::Interest => self.interest = parse_brl_amount(value),
            SlipField::Total => self.total = parse_brl_amount(value),
        }
    }

    /// Finish the draft as an immutable record.
    pub fn into_record(self, id: Uuid) -> PaymentRecord {
        PaymentRecord {
            id,
            name: self.name,
            period: self.period,
            tax_id: self.tax_id.chars().filter(char::is_ascii_digit).collect(),
            revenue_code: self.revenue_code,
            reference: self.reference,
            due_date: self.due_date,
            principal: self.principal,
            penalty: self.penalty,
            interest: self.interest,
            total: self.total,
        }
    }
}

/// Scan state for one block: the open draft and whether a total was seen.
#[derive(Debug, Clone, Default)]
pub struct SlipAccumulator {
    draft: Option<SlipDraft>,
    flushed: bool,
}

impl SlipAccumulator {
    /// Apply one field. Returns the completed draft when the field is the total.
    pub fn apply(&mut self, field: SlipField, value: &str) -> Option<SlipDraft> {
        self.draft
            .get_or_insert_with(SlipDraft::default)
            .set(field, value);

        if field == SlipField::Total {
            self.flushed = true;
            return self.draft.take();
        }

        None
    }

    /// Close the block. An open draft survives only if no total was ever seen.
    pub fn finish(self) -> Option<SlipDraft> {
        if self.flushed {
            None
        } else {
            self.draft
        }
    }
}

/// Run the accumulator over a block's normalized lines.
pub fn scan_lines<S: AsRef<str>>(lines: &[S]) -> Vec<SlipDraft> {
    let (acc, drafts) = lines.iter().enumerate().fold(
        (SlipAccumulator::default(), Vec::new()),
        |(mut acc, mut drafts), (i, line)| {
            let Some(tagged) = tag_field(line.as_ref()) else {
                return (acc, drafts);
            };

            let value = if tagged.value.is_empty() {
                wrapped_value(lines.get(i + 1).map(AsRef::as_ref))
            } else {
                tagged.value
            };

            tracing::trace!("field {} ({}) = {:?}", tagged.field.code(), tagged.label, value);

            if let Some(draft) = acc.apply(tagged.field, value) {
                drafts.push(draft);
            }
            (acc, drafts)
        },
    );

    let mut drafts = drafts;
    drafts.extend(acc.finish());
    drafts
}

/// Value printed on the line after its label, unless that line is a field itself.
///
/// A field line below an empty box is the next box, not a wrapped value;
/// taking it would copy e.g. the due date into the reference number.
fn wrapped_value(next: Option<&str>) -> &str {
    match next {
        Some(line) if tag_field(line).is_none() => line,
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_codes() {
        assert_eq!(SlipField::from_code("1"), Some(SlipField::Name));
        assert_eq!(SlipField::from_code("01"), Some(SlipField::Name));
        assert_eq!(SlipField::from_code("10"), Some(SlipField::Total));
        assert_eq!(SlipField::from_code("11"), None);
        assert_eq!(SlipField::from_code("00"), None);
        assert_eq!(SlipField::Interest.code(), "09");
        assert!(SlipField::Total.is_amount());
        assert!(!SlipField::DueDate.is_amount());
    }

    #[test]
    fn test_tag_field_separators() {
        let tagged = tag_field("01 NOME: ACME LTDA").unwrap();
        assert_eq!(tagged.field, SlipField::Name);
        assert_eq!(tagged.label, "NOME");
        assert_eq!(tagged.value, "ACME LTDA");

        let tagged = tag_field("02 PERÍODO DE APURAÇÃO 31/12/2023").unwrap();
        assert_eq!(tagged.field, SlipField::Period);
        assert_eq!(tagged.label, "PERÍODO DE APURAÇÃO");
        assert_eq!(tagged.value, "31/12/2023");

        let tagged = tag_field("10 - VALOR TOTAL R$ 1.500,00").unwrap();
        assert_eq!(tagged.field, SlipField::Total);
        assert_eq!(tagged.value, "R$ 1.500,00");

        let tagged = tag_field("7 Valor do Principal - 250,00").unwrap();
        assert_eq!(tagged.field, SlipField::Principal);
        assert_eq!(tagged.value, "250,00");
    }

    #[test]
    fn test_tag_field_empty_value() {
        let tagged = tag_field("01 NOME / TELEFONE").unwrap();
        assert_eq!(tagged.field, SlipField::Name);
        assert_eq!(tagged.value, "");
    }

    #[test]
    fn test_tag_field_value_after_single_space() {
        let tagged = tag_field("01 NOME ACME LTDA").unwrap();
        assert_eq!(tagged.label, "NOME");
        assert_eq!(tagged.value, "ACME LTDA");

        let tagged = tag_field("01 NOME / TELEFONE BETA SA").unwrap();
        assert_eq!(tagged.label, "NOME / TELEFONE");
        assert_eq!(tagged.value, "BETA SA");

        let tagged = tag_field("01 Nome Acme Ltda 12").unwrap();
        assert_eq!(tagged.value, "Acme Ltda 12");

        let tagged = tag_field("09 VALOR DOS JUROS E/OU ENCARGOS 5,00").unwrap();
        assert_eq!(tagged.label, "VALOR DOS JUROS E/OU ENCARGOS");
        assert_eq!(tagged.value, "5,00");
    }

    #[test]
    fn test_inline_name_does_not_take_next_line() {
        let lines = [
            "01 NOME ACME LTDA",
            "Rua das Flores 100",
            "10 VALOR TOTAL 10,00",
        ];

        let drafts = scan_lines(&lines);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].name, "ACME LTDA");
    }

    #[test]
    fn test_tag_field_rejects_plain_lines() {
        assert_eq!(tag_field("2089"), None);
        assert_eq!(tag_field("31/12/2023"), None);
        assert_eq!(tag_field("ACME LTDA"), None);
        assert_eq!(tag_field("12 MESES"), None);
    }

    #[test]
    fn test_total_flushes_and_resets() {
        let lines = [
            "01 NOME: ACME",
            "07 VALOR DO PRINCIPAL 100,00",
            "10 VALOR TOTAL 100,00",
            "01 NOME: BETA",
            "10 VALOR TOTAL 50,00",
        ];

        let drafts = scan_lines(&lines);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].name, "ACME");
        assert_eq!(drafts[0].principal, Decimal::new(10000, 2));
        assert_eq!(drafts[1].name, "BETA");
        assert_eq!(drafts[1].principal, Decimal::ZERO);
        assert_eq!(drafts[1].total, Decimal::new(5000, 2));
    }

    #[test]
    fn test_duplicate_code_overwrites() {
        let lines = ["01 NOME: FIRST", "01 NOME: SECOND", "10 VALOR TOTAL 1,00"];

        let drafts = scan_lines(&lines);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].name, "SECOND");
    }

    #[test]
    fn test_unflushed_draft_kept_without_total() {
        let lines = ["01 NOME: ACME", "07 VALOR DO PRINCIPAL 10,00"];

        let drafts = scan_lines(&lines);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].total, Decimal::ZERO);
    }

    #[test]
    fn test_trailing_fields_after_total_dropped() {
        let lines = ["01 NOME: ACME", "10 VALOR TOTAL 10,00", "04 CODIGO DA RECEITA 2089"];

        let drafts = scan_lines(&lines);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].revenue_code, "");
    }

    #[test]
    fn test_wrapped_value_from_next_line() {
        let lines = [
            "01 NOME / TELEFONE",
            "ACME COMERCIO LTDA",
            "05 NUMERO DE REFERENCIA",
            "06 DATA DE VENCIMENTO 31/01/2024",
            "10 VALOR TOTAL",
            "1.500,00",
        ];

        let drafts = scan_lines(&lines);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].name, "ACME COMERCIO LTDA");
        assert_eq!(drafts[0].reference, "");
        assert_eq!(drafts[0].due_date, "31/01/2024");
        assert_eq!(drafts[0].total, Decimal::new(150000, 2));
    }

    #[test]
    fn test_into_record_keeps_tax_id_digits() {
        let mut draft = SlipDraft::default();
        draft.set(SlipField::TaxId, "12.345.678/0001-90");

        let record = draft.into_record(Uuid::nil());
        assert_eq!(record.tax_id, "12345678000190");
    }
}

//! Output formatting for CLI commands.

use std::fmt;

use serde::Serialize;

use crate::cli::args::{OutputFormat, PolylemmaArgs};
use crate::error::Result;
use crate::grammar::GramBitSet;
use crate::language::{LangMask, Language};
use crate::lemma::{Lemma, LllLevel};
use crate::lemma_forms::{FormType, LemmaForms};
use crate::word_instance::{StickySide, WordInstance};

/// One lemma as printed by `analyze`.
#[derive(Debug, Serialize)]
pub struct LemmaReport {
    pub text: String,
    pub language: Language,
    pub quality: Vec<&'static str>,
    pub stem_grammar: String,
    pub flex_grammars: Vec<String>,
    pub initial_form: String,
    pub token_pos: usize,
    pub token_span: usize,
}

impl From<&Lemma> for LemmaReport {
    fn from(lemma: &Lemma) -> Self {
        LemmaReport {
            text: lemma.text().to_string(),
            language: lemma.language(),
            quality: lemma.quality().names(),
            stem_grammar: lemma.stem_gram_set().to_string(),
            flex_grammars: lemma
                .flex_gram_sets()
                .iter()
                .map(GramBitSet::to_string)
                .collect(),
            initial_form: lemma.initial_form().to_string(),
            token_pos: lemma.token_pos(),
            token_span: lemma.token_span(),
        }
    }
}

/// Lemmas of one analyzed word.
#[derive(Debug, Serialize)]
pub struct WordAnalysis {
    pub word: String,
    pub lemmas: Vec<LemmaReport>,
}

/// Result structure for `analyze`.
#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    pub words: Vec<WordAnalysis>,
    pub total_lemmas: usize,
}

/// One word instance after its update passes.
#[derive(Debug, Serialize)]
pub struct InstanceReport {
    pub form: String,
    pub normalized_form: String,
    pub languages: LangMask,
    pub case: Vec<&'static str>,
    pub form_type: FormType,
    pub stop_word: Option<StickySide>,
    pub lemmas: Vec<LemmaForms>,
    pub redundant_lemmas: Vec<LemmaForms>,
}

impl From<&WordInstance> for InstanceReport {
    fn from(wi: &WordInstance) -> Self {
        InstanceReport {
            form: wi.form().to_string(),
            normalized_form: wi.normalized_form().to_string(),
            languages: wi.lang_mask(),
            case: wi.case_flags().names(),
            form_type: wi.form_type(),
            stop_word: wi.stop_word(),
            lemmas: wi.lemmas().to_vec(),
            redundant_lemmas: wi.redundant_lemmas().to_vec(),
        }
    }
}

/// Result structure for `instance`.
#[derive(Debug, Serialize)]
pub struct InstanceResult {
    pub instances: Vec<InstanceReport>,
}

/// Tables of one language in a decimator file.
#[derive(Debug, Serialize)]
pub struct DecimatorLanguage {
    pub language: Language,
    pub max_forms: Option<usize>,
    pub good_features: Vec<String>,
}

/// Result structure for `decimate`.
#[derive(Debug, Serialize)]
pub struct DecimatorReport {
    pub path: String,
    pub loaded: bool,
    pub error: Option<String>,
    pub languages: Vec<DecimatorLanguage>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + fmt::Display>(
    message: &str,
    result: &T,
    args: &PolylemmaArgs,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_human<T: fmt::Display>(message: &str, result: &T, args: &PolylemmaArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }
    print!("{result}");
    Ok(())
}

fn output_json<T: Serialize>(result: &T, args: &PolylemmaArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Joins `items` with `sep`, or `-` when there are none.
fn join_or_dash<S: AsRef<str>>(items: &[S], sep: &str) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(sep)
    }
}

fn lll_marker(level: LllLevel) -> &'static str {
    match level {
        LllLevel::No => "",
        LllLevel::Lll => " lll",
        LllLevel::SameText => " same-text",
        LllLevel::Tantum => " tantum",
    }
}

fn write_lemma_forms(f: &mut fmt::Formatter<'_>, lf: &LemmaForms, marker: &str) -> fmt::Result {
    writeln!(
        f,
        "  {marker}{} [{}] {}{}{}",
        lf.lemma_text(),
        lf.language(),
        join_or_dash(&lf.quality().names(), "|"),
        if lf.is_best() { " best" } else { "" },
        lll_marker(lf.exact_lemma()),
    )?;
    if !lf.stem_grammar().is_empty() {
        writeln!(f, "      stem: {}", lf.stem_grammar())?;
    }
    if let Some(forms) = lf.forms() {
        let names: Vec<&str> = forms.keys().map(String::as_str).collect();
        writeln!(f, "      forms ({}): {}", names.len(), join_or_dash(&names, ", "))?;
    }
    Ok(())
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in &self.words {
            writeln!(f, "{}", word.word)?;
            if word.lemmas.is_empty() {
                writeln!(f, "  (no lemmas)")?;
            }
            for lemma in &word.lemmas {
                writeln!(
                    f,
                    "  {} [{}] {} {} {}",
                    lemma.text,
                    lemma.language,
                    join_or_dash(&lemma.quality, "|"),
                    if lemma.stem_grammar.is_empty() {
                        "-"
                    } else {
                        lemma.stem_grammar.as_str()
                    },
                    join_or_dash(&lemma.flex_grammars, " | "),
                )?;
            }
        }
        writeln!(f)?;
        writeln!(f, "Total lemmas: {}", self.total_lemmas)
    }
}

impl fmt::Display for InstanceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instance in &self.instances {
            write!(
                f,
                "{} ({}) languages: {} case: {} form type: {:?}",
                instance.form,
                instance.normalized_form,
                instance.languages,
                join_or_dash(&instance.case, "|"),
                instance.form_type,
            )?;
            match instance.stop_word {
                Some(side) => writeln!(f, " stop word: {side:?}")?,
                None => writeln!(f)?,
            }
            for lf in &instance.lemmas {
                write_lemma_forms(f, lf, "")?;
            }
            for lf in &instance.redundant_lemmas {
                write_lemma_forms(f, lf, "~")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for DecimatorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Decimator: {}", self.path)?;
        if let Some(error) = &self.error {
            return writeln!(f, "Rejected: {error}");
        }
        for language in &self.languages {
            let limit = language
                .max_forms
                .map_or_else(|| "unlimited".to_string(), |n| n.to_string());
            writeln!(
                f,
                "{} max forms: {} good features: {}",
                language.language,
                limit,
                language.good_features.len()
            )?;
            for features in &language.good_features {
                writeln!(f, "  {features}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lemma::{LemmaSetter, Quality};

    #[test]
    fn test_join_or_dash() {
        assert_eq!(join_or_dash::<&str>(&[], ", "), "-");
        assert_eq!(join_or_dash(&["a", "b"], "|"), "a|b");
    }

    #[test]
    fn test_lemma_report() {
        let mut lemma = Lemma::new(Language::English);
        let mut setter = LemmaSetter::new(&mut lemma);
        setter.set_text("walk");
        setter.set_quality(Quality::BASTARD);
        setter.set_initial_form("walked");
        setter.set_token(0, 1);

        let report = LemmaReport::from(&lemma);
        assert_eq!(report.text, "walk");
        assert_eq!(report.quality, vec!["bastard"]);
        assert_eq!(report.initial_form, "walked");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["language"], "eng");
        assert_eq!(json["token_span"], 1);
    }

    #[test]
    fn test_analysis_display() {
        let result = AnalysisResult {
            words: vec![WordAnalysis {
                word: "xyzzy".to_string(),
                lemmas: Vec::new(),
            }],
            total_lemmas: 0,
        };
        let text = result.to_string();
        assert!(text.contains("xyzzy"));
        assert!(text.contains("(no lemmas)"));
        assert!(text.ends_with("Total lemmas: 0\n"));
    }

    #[test]
    fn test_decimator_display() {
        let report = DecimatorReport {
            path: "bad.txt".to_string(),
            loaded: false,
            error: Some("line 1: unknown grammeme".to_string()),
            languages: Vec::new(),
        };
        assert!(report.to_string().contains("Rejected: line 1"));

        let report = DecimatorReport {
            path: "good.txt".to_string(),
            loaded: true,
            error: None,
            languages: vec![DecimatorLanguage {
                language: Language::Turkish,
                max_forms: None,
                good_features: vec!["S,nom".to_string()],
            }],
        };
        let text = report.to_string();
        assert!(text.contains("tur max forms: unlimited good features: 1"));
    }
}

use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{Category, Example, LabeledError, PipelineData, Signature, SyntaxShape, Type};

use crate::ops;
use crate::TrendsPlugin;

use super::util;

pub struct Similarity;

impl PluginCommand for Similarity {
    type Plugin = TrendsPlugin;

    fn name(&self) -> &str {
        "trends similarity"
    }

    fn description(&self) -> &str {
        "Compute similarity between two trend topics"
    }

    fn signature(&self) -> Signature {
        Signature::build(self.name())
            .input_output_type(Type::Nothing, Type::record())
            .required("a", SyntaxShape::String, "First topic")
            .required("b", SyntaxShape::String, "Second topic")
            .named(
                "metric",
                SyntaxShape::String,
                "Metric: topic, levenshtein, jaro-winkler, cosine (default: topic)",
                Some('m'),
            )
            .switch("all", "Compute all metrics at once", Some('a'))
            .category(Category::Experimental)
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["similarity", "jaccard", "levenshtein", "jaro", "cosine", "compare"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![
            Example {
                example: r#"trends similarity "AI chatbots" "ai chatbots!""#,
                description: "Topics that normalize identically score 1.0",
                result: None,
            },
            Example {
                example: r#"trends similarity "crypto regulation" "crypto ban" --all"#,
                description: "All metrics at once",
                result: None,
            },
        ]
    }

    fn run(
        &self,
        _plugin: &TrendsPlugin,
        _engine: &EngineInterface,
        call: &EvaluatedCall,
        _input: PipelineData,
    ) -> Result<PipelineData, LabeledError> {
        let a: String = call.req(0)?;
        let b: String = call.req(1)?;
        let all: bool = call.has_flag("all")?;
        let metric: String = call
            .get_flag::<String>("metric")?
            .unwrap_or_else(|| "topic".into());
        let head = call.head;

        let result = ops::op_similarity(&a, &b, &metric, all).map_err(|e| util::labeled(e, head))?;
        Ok(PipelineData::Value(util::from_json(&result, head), None))
    }
}

use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{Category, Example, LabeledError, PipelineData, Signature, SyntaxShape, Type};

use crate::ops;
use crate::TrendsPlugin;

use super::util;

pub struct Aggregate;

impl PluginCommand for Aggregate {
    type Plugin = TrendsPlugin;

    fn name(&self) -> &str {
        "trends aggregate"
    }

    fn description(&self) -> &str {
        "Cluster raw trend mentions into deduplicated, scored and ranked trends"
    }

    fn extra_description(&self) -> &str {
        "Input rows need a `topic` column; `source`, `volume`, `timestamp` (int ms or date), \
         `url` and `region` are optional. Rows are merged into the first existing cluster \
         whose topic is similar enough, so input order matters."
    }

    fn signature(&self) -> Signature {
        Signature::build(self.name())
            .input_output_types(vec![
                (Type::table(), Type::record()),
                (Type::list(Type::Any), Type::record()),
                (Type::Any, Type::record()),
            ])
            .named(
                "threshold",
                SyntaxShape::Number,
                "Similarity needed to join a cluster, 0-1 (default: 0.6)",
                Some('t'),
            )
            .named(
                "max",
                SyntaxShape::Int,
                "Maximum number of trends returned (default: 100)",
                Some('n'),
            )
            .named(
                "metric",
                SyntaxShape::String,
                "Metric: topic, levenshtein, jaro-winkler, cosine (default: topic)",
                Some('m'),
            )
            .switch(
                "canonical-urls",
                "Strip tracking parameters so URL variants count once",
                None,
            )
            .named(
                "config",
                SyntaxShape::String,
                "Path to a trends TOML config file",
                None,
            )
            .category(Category::Experimental)
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["trends", "aggregate", "cluster", "dedup", "momentum", "rank"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![
            Example {
                example: r#"[[topic source]; ["AI chatbots" hn] ["ai chatbots!" reddit] ["crypto regulation" hn]] | trends aggregate"#,
                description: "Merge punctuation variants reported by two sources",
                result: None,
            },
            Example {
                example: r#"open mentions.json | trends aggregate --threshold 0.8 --max 20 | get trends"#,
                description: "Stricter clustering, top 20 trends as a table",
                result: None,
            },
        ]
    }

    fn run(
        &self,
        _plugin: &TrendsPlugin,
        _engine: &EngineInterface,
        call: &EvaluatedCall,
        input: PipelineData,
    ) -> Result<PipelineData, LabeledError> {
        let head = call.head;
        let config = util::load_config(call.get_flag("config")?, head)?;
        let mut opts = config.aggregate;

        if let Some(threshold) = call.get_flag::<f64>("threshold")? {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(LabeledError::new("threshold must be between 0 and 1")
                    .with_label("out of range", head));
            }
            opts.similarity_threshold = threshold;
        }
        if let Some(max) = call.get_flag::<i64>("max")? {
            opts.max_trends = max.max(0) as usize;
        }
        if let Some(metric) = call.get_flag::<String>("metric")? {
            opts.metric = ops::parse_metric(&metric).map_err(|e| util::labeled(e, head))?;
        }
        if call.has_flag("canonical-urls")? {
            opts.canonicalize_urls = true;
        }

        let rows = util::input_rows(input, head)?;
        let result = ops::op_aggregate(&rows, &opts).map_err(|e| util::labeled(e, head))?;

        Ok(PipelineData::Value(util::from_json(&result, head), None))
    }
}

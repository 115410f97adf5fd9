use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{
    Category, Example, LabeledError, ListStream, PipelineData, Signals, Signature, SyntaxShape,
    Type, Value,
};

use crate::algo::filters::{DEFAULT_MIN_SCORE, DEFAULT_MIN_SOURCES};
use crate::algo::types::Momentum;
use crate::ops;
use crate::TrendsPlugin;

use super::util;

pub struct Query;

impl PluginCommand for Query {
    type Plugin = TrendsPlugin;

    fn name(&self) -> &str {
        "trends query"
    }

    fn description(&self) -> &str {
        "Filter and rank aggregated trends by momentum, sources, score and region"
    }

    fn signature(&self) -> Signature {
        Signature::build(self.name())
            .input_output_types(vec![
                (Type::record(), Type::table()),
                (Type::table(), Type::table()),
                (Type::list(Type::Any), Type::list(Type::Any)),
            ])
            .named(
                "min-momentum",
                SyntaxShape::String,
                "Lowest momentum kept: falling, stable, rising, exploding",
                None,
            )
            .named(
                "min-sources",
                SyntaxShape::Int,
                "Minimum number of distinct sources",
                None,
            )
            .named("min-score", SyntaxShape::Int, "Minimum combined score", None)
            .named(
                "region",
                SyntaxShape::String,
                "Keep trends seen in this region plus global ones",
                Some('r'),
            )
            .named("top", SyntaxShape::Int, "Keep the N highest scoring", Some('n'))
            .switch("exploding", "Only exploding trends", Some('e'))
            .switch(
                "high-confidence",
                "Score >= 50 from at least 2 sources (unless overridden)",
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
        vec!["trends", "filter", "top", "exploding", "region", "momentum"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![
            Example {
                example: "open mentions.json | trends aggregate | trends query --exploding",
                description: "Only trends whose volume more than doubled",
                result: None,
            },
            Example {
                example: "open mentions.json | trends aggregate | trends query --region US --top 5",
                description: "Top five trends relevant to the US",
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
        let mut query = config.query;

        if let Some(name) = call.get_flag::<String>("min-momentum")? {
            query.min_momentum = Some(ops::parse_momentum(&name).map_err(|e| util::labeled(e, head))?);
        }
        if call.has_flag("exploding")? {
            query.min_momentum = Some(Momentum::Exploding);
        }
        if call.has_flag("high-confidence")? {
            query.min_score.get_or_insert(DEFAULT_MIN_SCORE);
            query.min_sources.get_or_insert(DEFAULT_MIN_SOURCES);
        }
        if let Some(n) = call.get_flag::<i64>("min-sources")? {
            query.min_sources = Some(n.max(0) as usize);
        }
        if let Some(n) = call.get_flag::<i64>("min-score")? {
            query.min_score = Some(n.clamp(0, 100) as u8);
        }
        if let Some(region) = call.get_flag::<String>("region")? {
            query.region = Some(region);
        }
        if let Some(n) = call.get_flag::<i64>("top")? {
            query.top = Some(n.max(0) as usize);
        }

        let value = input.into_value(head)?;
        let result = ops::op_query(&util::to_json(&value), &query).map_err(|e| util::labeled(e, head))?;

        let trends: Vec<Value> = match util::from_json(&result, head) {
            Value::List { vals, .. } => vals,
            other => vec![other],
        };
        Ok(ListStream::new(trends.into_iter(), head, Signals::empty()).into())
    }
}

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::Error;
use crate::source::client::SourceClient;
use crate::source::{Clause, FlagSummary, SourceFlag, SourceRule, SourceSegment};
use crate::target::{
    Constraint, Distribution, EnvironmentDocument, Operator, TargetFlag, TargetRule,
    TargetSegment, Variant, STRING_COMPARISON_TYPE, VARIANT_FLAG_TYPE,
};

/// Fetches each flag's detail plus each environment's native segments
/// (once per environment), and folds everything into one session. Any
/// failed call aborts the run with nothing written.
pub async fn run(
    client: &SourceClient,
    flags: &[FlagSummary],
) -> Result<Vec<EnvironmentDocument>, Error> {
    let mut session = Session::new();

    for summary in flags {
        debug!(flag = %summary.key, name = %summary.name, "fetching flag detail");
        let flag = client.flag_detail(&summary.key).await?;

        for environment in flag.environments.keys() {
            if !session.has_segments_for(environment) {
                let segments = client.segments(environment).await?;
                info!(%environment, count = segments.len(), "fetched native segments");
                session.cache_segments(environment, &segments)?;
            }
        }

        session.add_flag(&flag)?;
    }

    Ok(session.finish())
}

/// State for one migration run: the synthesized-segment counter, the
/// per-environment cache of translated native segments, and the
/// accumulating documents. Nothing survives past `finish`.
pub struct Session {
    segment_counter: u64,
    native_segments: HashMap<String, Vec<TargetSegment>>,
    documents: Vec<EnvironmentDocument>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            segment_counter: 1,
            native_segments: HashMap::new(),
            documents: Vec::new(),
        }
    }

    pub fn has_segments_for(&self, environment: &str) -> bool {
        self.native_segments.contains_key(environment)
    }

    /// Translates an environment's native segments and caches them until
    /// `finish` appends them to that environment's document.
    ///
    /// Within a segment, each rule's clause list replaces the previous
    /// one: only the last rule's clauses survive. A segment with no
    /// rules keeps an empty constraint list.
    pub fn cache_segments(
        &mut self,
        environment: &str,
        segments: &[SourceSegment],
    ) -> Result<(), Error> {
        let mut translated = Vec::with_capacity(segments.len());

        for segment in segments {
            let mut constraints = Vec::new();
            for rule in &segment.rules {
                constraints = rule
                    .clauses
                    .iter()
                    .map(|clause| constraint_from(clause, Operator::from_source_op(&clause.op)))
                    .collect::<Result<Vec<_>, _>>()?;
            }
            translated.push(TargetSegment::new(segment.key.clone(), constraints));
        }

        self.native_segments
            .insert(environment.to_string(), translated);
        Ok(())
    }

    /// Translates one flag into every environment document it names,
    /// creating documents on first reference. Each source rule becomes
    /// one synthesized segment plus one target rule pointing at it.
    pub fn add_flag(&mut self, flag: &SourceFlag) -> Result<(), Error> {
        let variants: Vec<Variant> = flag
            .variations
            .iter()
            .map(|variation| {
                let value = variation.value_string();
                Variant {
                    key: value.clone(),
                    name: value,
                }
            })
            .collect();

        for (environment, config) in &flag.environments {
            let mut rules = Vec::with_capacity(config.rules.len());
            let mut rule_segments = Vec::with_capacity(config.rules.len());

            for rule in &config.rules {
                // Flag-rule clauses are pinned to an equality match; only
                // native segments honor the operator table.
                let constraints = rule
                    .clauses
                    .iter()
                    .map(|clause| constraint_from(clause, Operator::Eq))
                    .collect::<Result<Vec<_>, _>>()?;

                let segment_key = self.next_segment_key();
                rule_segments.push(TargetSegment::new(segment_key.clone(), constraints));

                rules.push(TargetRule {
                    segment: segment_key,
                    distributions: distributions_for(flag, rule, &variants)?,
                });
            }

            let document = self.document_mut(environment);
            document.flags.push(TargetFlag {
                key: flag.key.clone(),
                flag_type: VARIANT_FLAG_TYPE.to_string(),
                name: flag.name.clone(),
                description: flag.description.clone(),
                enabled: true,
                variants: variants.clone(),
                rules,
            });
            document.segments.extend(rule_segments);
        }

        Ok(())
    }

    /// Appends each environment's cached native segments after its
    /// rule-derived ones, exactly once, and returns the documents in
    /// environment-first-seen order.
    pub fn finish(mut self) -> Vec<EnvironmentDocument> {
        for document in &mut self.documents {
            if let Some(native) = self.native_segments.remove(&document.namespace) {
                document.segments.extend(native);
            }
        }
        self.documents
    }

    /// Keys follow the `segment_00{N}` pattern with a run-global,
    /// strictly increasing counter. Never reset per flag or environment.
    fn next_segment_key(&mut self) -> String {
        let key = format!("segment_00{}", self.segment_counter);
        self.segment_counter += 1;
        key
    }

    fn document_mut(&mut self, environment: &str) -> &mut EnvironmentDocument {
        let index = match self
            .documents
            .iter()
            .position(|d| d.namespace == environment)
        {
            Some(index) => index,
            None => {
                self.documents.push(EnvironmentDocument {
                    namespace: environment.to_string(),
                    flags: Vec::new(),
                    segments: Vec::new(),
                });
                self.documents.len() - 1
            }
        };
        &mut self.documents[index]
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn constraint_from(clause: &Clause, operator: Operator) -> Result<Constraint, Error> {
    Ok(Constraint {
        constraint_type: STRING_COMPARISON_TYPE.to_string(),
        property: clause.attribute.clone(),
        operator,
        value: clause.single_value()?,
    })
}

/// A rule with a rollout spreads across its weighted variations at
/// `weight / 1000` percent each; otherwise its single variation is
/// served at 100%.
fn distributions_for(
    flag: &SourceFlag,
    rule: &SourceRule,
    variants: &[Variant],
) -> Result<Vec<Distribution>, Error> {
    match &rule.rollout {
        Some(rollout) => rollout
            .variations
            .iter()
            .map(|weighted| {
                Ok(Distribution {
                    variant: variant_key(flag, variants, weighted.variation)?,
                    rollout: weighted.weight as f64 / 1000.0,
                })
            })
            .collect(),
        None => {
            let index = rule
                .variation
                .ok_or_else(|| Error::RuleWithoutDistribution {
                    flag: flag.key.clone(),
                })?;
            Ok(vec![Distribution {
                variant: variant_key(flag, variants, index)?,
                rollout: 100.0,
            }])
        }
    }
}

fn variant_key(flag: &SourceFlag, variants: &[Variant], index: usize) -> Result<String, Error> {
    variants
        .get(index)
        .map(|variant| variant.key.clone())
        .ok_or_else(|| Error::VariationOutOfRange {
            flag: flag.key.clone(),
            index,
            count: variants.len(),
        })
}

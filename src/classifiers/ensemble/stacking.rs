use crate::classifiers::ensemble::aggregator::{majority, member_distribution};
use crate::classifiers::ensemble::{ConfigError, VoteContext};
use crate::classifiers::{Classifier, predicted_class};
use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use std::sync::Arc;

/// Derived instance the meta-learner sees.
///
/// Attribute layout: the original input attributes (only when cascading), then
/// one numeric attribute per pool learner and class holding that learner's
/// normalised vote, pool order first, class order second; the label comes last.
/// Changing this order changes what a trained meta-model means.
///
/// The label is whether the active set's majority answer was right for this
/// instance (`0` no, `1` yes), `None` when the instance is unlabelled.
pub struct StackingContext {
    instance: DenseInstance,
}

impl StackingContext {
    pub fn build(
        meta_header: &Arc<InstanceHeader>,
        ctx: &VoteContext<'_>,
        cascade: bool,
        correct: Option<bool>,
    ) -> Self {
        let n = ctx.num_classes;
        let mut values = Vec::with_capacity(meta_header.number_of_attributes());

        if cascade {
            let source = ctx.instance.header();
            for i in source.input_indices() {
                values.push(ctx.instance.value_at_index(i).unwrap_or(f64::NAN));
            }
        }

        for votes in ctx.member_votes {
            match member_distribution(votes, n) {
                Some(dist) => values.extend(dist),
                None => values.extend(std::iter::repeat_n(0.0, n)),
            }
        }

        values.push(correct.map_or(f64::NAN, |c| if c { 1.0 } else { 0.0 }));

        Self {
            instance: DenseInstance::new(
                Arc::clone(meta_header),
                values,
                ctx.instance.weight(),
            ),
        }
    }

    pub fn features(&self) -> Vec<f64> {
        let mut v = self.instance.to_vec();
        v.pop();
        v
    }

    pub fn label(&self) -> Option<f64> {
        self.instance.class_value()
    }

    pub fn as_instance(&self) -> &dyn Instance {
        &self.instance
    }
}

/// Meta-learner that judges the active set's majority answer.
///
/// It is trained online to tell, from every pool member's votes, whether the
/// active majority is right. At prediction time the majority class is kept when
/// the meta-learner trusts it and swapped for the other class when it does not;
/// an untrained or undecided meta-learner leaves the majority tally untouched.
pub struct StackingAggregator {
    meta: Box<dyn Classifier>,
    cascade_features: bool,
    meta_header: Option<Arc<InstanceHeader>>,
}

impl StackingAggregator {
    pub fn new(meta: Box<dyn Classifier>, cascade_features: bool) -> Self {
        Self {
            meta,
            cascade_features,
            meta_header: None,
        }
    }

    pub fn meta_header(&self) -> Option<&Arc<InstanceHeader>> {
        self.meta_header.as_ref()
    }

    pub fn set_model_context(
        &mut self,
        header: &Arc<InstanceHeader>,
        pool_size: usize,
    ) -> Result<(), ConfigError> {
        let classes = header.number_of_classes();
        if classes != 2 {
            return Err(ConfigError::NonBinaryStacking { classes });
        }
        if header.class_attribute().is_none() {
            return Err(ConfigError::UnsupportedTarget);
        }

        let mut attributes: Vec<AttributeRef> = Vec::new();
        if self.cascade_features {
            attributes.extend(header.input_indices().map(|i| Arc::clone(&header.attributes[i])));
        }
        for learner in 0..pool_size {
            for class in 0..classes {
                attributes.push(Arc::new(NumericAttribute::new(format!(
                    "learner{learner}_class{class}"
                ))));
            }
        }
        attributes.push(Arc::new(NominalAttribute::with_values(
            "majority_correct",
            vec!["no".into(), "yes".into()],
        )));

        let class_index = attributes.len() - 1;
        let meta_header = Arc::new(InstanceHeader::new(
            format!("{}-stacking", header.relation_name()),
            attributes,
            class_index,
        ));
        self.meta.set_model_context(Arc::clone(&meta_header))?;
        self.meta_header = Some(meta_header);
        Ok(())
    }

    pub fn combine(&self, ctx: &VoteContext<'_>) -> Vec<f64> {
        let tally = majority(ctx);
        let Some(meta_header) = self.meta_header.as_ref() else {
            return tally;
        };
        let Some(answer) = predicted_class(&tally) else {
            return tally;
        };

        let context = StackingContext::build(meta_header, ctx, self.cascade_features, None);
        let verdict = self.meta.get_votes_for_instance(context.as_instance());
        let Some(trust) = member_distribution(&verdict, 2) else {
            return tally;
        };
        let (wrong, right) = (trust[0], trust[1]);
        if wrong == right {
            return tally;
        }

        let mut votes = vec![0.0; ctx.num_classes];
        let other = 1 - answer;
        votes[answer] = right;
        votes[other] = wrong;
        votes
    }

    pub fn learn(&mut self, ctx: &VoteContext<'_>) {
        let Some(meta_header) = self.meta_header.as_ref() else {
            return;
        };
        let Some(truth) = ctx.instance.class_value() else {
            return;
        };
        let correct = predicted_class(&majority(ctx)) == Some(truth as usize);
        let context =
            StackingContext::build(meta_header, ctx, self.cascade_features, Some(correct));
        self.meta.train_on_instance(context.as_instance());
    }

    pub fn reset(&mut self) {
        self.meta.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        ConstantClassifier, TrainSpyClassifier, binary_header, binary_instance, nominal_header,
    };
    use std::sync::Mutex;

    /// Keeps the label of every meta instance it is trained on.
    struct LabelRecorder(Arc<Mutex<Vec<f64>>>);

    impl Classifier for LabelRecorder {
        fn get_votes_for_instance(&self, _instance: &dyn Instance) -> Vec<f64> {
            Vec::new()
        }

        fn set_model_context(&mut self, _header: Arc<InstanceHeader>) -> Result<(), ConfigError> {
            Ok(())
        }

        fn train_on_instance(&mut self, instance: &dyn Instance) {
            if let Some(label) = instance.class_value() {
                self.0.lock().unwrap().push(label);
            }
        }

        fn reset(&mut self) {}
    }

    fn bound(meta: Box<dyn Classifier>, pool: usize) -> StackingAggregator {
        let mut s = StackingAggregator::new(meta, false);
        s.set_model_context(&binary_header(), pool).unwrap();
        s
    }

    fn context_for(
        header: &Arc<InstanceHeader>,
        inst: &dyn Instance,
        votes: &[Vec<f64>],
        cascade: bool,
        correct: Option<bool>,
    ) -> StackingContext {
        let ctx = VoteContext {
            instance: inst,
            member_votes: votes,
            active: &[],
            fitness: &[],
            num_classes: 2,
        };
        StackingContext::build(header, &ctx, cascade, correct)
    }

    #[test]
    fn meta_header_layout_is_cascade_then_votes_then_label() {
        let (spy, _) = TrainSpyClassifier::new();
        let mut s = StackingAggregator::new(Box::new(spy), true);
        s.set_model_context(&binary_header(), 2).unwrap();

        let h = s.meta_header().unwrap();
        let names: Vec<String> = h.attributes.iter().map(|a| a.name()).collect();
        assert_eq!(
            names,
            vec![
                "x",
                "learner0_class0",
                "learner0_class1",
                "learner1_class0",
                "learner1_class1",
                "majority_correct"
            ]
        );
        assert_eq!(h.class_index(), 5);
        assert_eq!(h.number_of_classes(), 2);
    }

    #[test]
    fn context_values_follow_layout() {
        let (spy, _) = TrainSpyClassifier::new();
        let mut s = StackingAggregator::new(Box::new(spy), true);
        s.set_model_context(&binary_header(), 3).unwrap();
        let h = Arc::clone(s.meta_header().unwrap());

        let inst = binary_instance(0.25, Some(1));
        let votes = vec![vec![1.0, 3.0], vec![], vec![2.0, 2.0]];
        let c = context_for(&h, &inst, &votes, true, Some(false));
        assert_eq!(c.features(), vec![0.25, 0.25, 0.75, 0.0, 0.0, 0.5, 0.5]);
        assert_eq!(c.label(), Some(0.0));
    }

    #[test]
    fn without_cascade_only_votes_are_features() {
        let (spy, _) = TrainSpyClassifier::new();
        let mut s = StackingAggregator::new(Box::new(spy), false);
        s.set_model_context(&binary_header(), 1).unwrap();
        let h = Arc::clone(s.meta_header().unwrap());

        let inst = binary_instance(0.9, None);
        let c = context_for(&h, &inst, &[vec![0.0, 4.0]], false, None);
        assert_eq!(c.features(), vec![0.0, 1.0]);
        assert_eq!(c.label(), None);
    }

    #[test]
    fn rejects_non_binary_targets() {
        let (spy, _) = TrainSpyClassifier::new();
        let mut s = StackingAggregator::new(Box::new(spy), false);
        assert_eq!(
            s.set_model_context(&nominal_header(3), 2),
            Err(ConfigError::NonBinaryStacking { classes: 3 })
        );
        assert!(s.meta_header().is_none());
    }

    #[test]
    fn learn_skips_unlabelled_instances() {
        let (spy, handle) = TrainSpyClassifier::new();
        let mut s = StackingAggregator::new(Box::new(spy), false);
        s.set_model_context(&binary_header(), 1).unwrap();

        let votes = vec![vec![0.3, 0.7]];
        for label in [Some(0), None, Some(1)] {
            let inst = binary_instance(0.5, label);
            let ctx = VoteContext {
                instance: &inst,
                member_votes: &votes,
                active: &[0],
                fitness: &[1.0],
                num_classes: 2,
            };
            s.learn(&ctx);
        }
        assert_eq!(handle.count(), 2);
    }

    #[test]
    fn meta_label_is_whether_the_active_majority_was_right() {
        let labels = Arc::new(Mutex::new(Vec::new()));
        let mut s = bound(Box::new(LabelRecorder(Arc::clone(&labels))), 3);

        // Active members 0 and 2 both vote class 1; member 1 is not active.
        let votes = vec![vec![0.1, 0.9], vec![1.0, 0.0], vec![0.4, 0.6]];
        for label in [1, 0, 1] {
            let inst = binary_instance(0.0, Some(label));
            s.learn(&VoteContext {
                instance: &inst,
                member_votes: &votes,
                active: &[0, 2],
                fitness: &[0.0; 3],
                num_classes: 2,
            });
        }

        let silent = vec![vec![], vec![1.0, 0.0], vec![0.0, 0.0]];
        let inst = binary_instance(0.0, Some(1));
        s.learn(&VoteContext {
            instance: &inst,
            member_votes: &silent,
            active: &[0, 2],
            fitness: &[0.0; 3],
            num_classes: 2,
        });

        assert_eq!(*labels.lock().unwrap(), vec![1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn distrusted_majority_is_swapped() {
        // A meta-learner that always answers "no".
        let s = bound(Box::new(ConstantClassifier::new(0)), 2);
        let inst = binary_instance(0.0, None);
        let votes = vec![vec![0.2, 0.8], vec![0.9, 0.1]];
        let ctx = VoteContext {
            instance: &inst,
            member_votes: &votes,
            active: &[0],
            fitness: &[0.0; 2],
            num_classes: 2,
        };
        assert_eq!(s.combine(&ctx), vec![1.0, 0.0]);

        let trusting = bound(Box::new(ConstantClassifier::new(1)), 2);
        assert_eq!(trusting.combine(&ctx), vec![0.0, 1.0]);
    }

    #[test]
    fn silent_meta_learner_leaves_the_majority_tally() {
        let s = bound(Box::new(LabelRecorder(Arc::default())), 2);
        let inst = binary_instance(0.0, None);
        let votes = vec![vec![0.2, 0.8], vec![0.7, 0.3]];
        let ctx = VoteContext {
            instance: &inst,
            member_votes: &votes,
            active: &[0, 1],
            fitness: &[0.0; 2],
            num_classes: 2,
        };
        assert_eq!(s.combine(&ctx), vec![1.0, 1.0]);
    }
}

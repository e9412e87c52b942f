mod classifier_none_votes;

pub use classifier_none_votes::ClassifierNoneVotes;

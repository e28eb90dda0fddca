/// A marker type indicating that a model is **not yet trained**.
///
/// An `Unfitted` linear model only carries its initial (zero) parameters and
/// cannot predict. Estimators such as [`Ridge`](super::Ridge) take one as
/// their starting point and turn it into a `Fitted` model.
pub struct Unfitted;

/// A marker type indicating that a model has been **fully trained**.
///
/// A `Fitted` model contains **only inference parameters**: no solver state
/// and no regularization hyperparameters.
pub struct Fitted;

// Implemented by types holding channel subscriptions that capture an `Rc` of themselves;
// the cycle has to be broken by hand before the value can be dropped.
pub trait Destroyable {
    fn destroy(&mut self);
}

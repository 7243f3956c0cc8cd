/// Anything that consumes a stream of `T` one value at a time, e.g. the game engine
/// consuming [`crate::model::GameEngineCommand`]s forwarded by a front end.
pub trait EventHandler<T> {
    fn handle_event(&mut self, event: &T);
}

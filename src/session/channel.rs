use std::io;

/// A live connection to a compiler process.
///
/// Each `evaluate` sends one expression and blocks for its reply. How the
/// process is spawned and reached is up to the implementor.
pub trait CommandChannel {
    fn evaluate(&mut self, expression: &str) -> io::Result<String>;

    fn close(&mut self) -> io::Result<()>;
}

impl<C: CommandChannel + ?Sized> CommandChannel for Box<C> {
    fn evaluate(&mut self, expression: &str) -> io::Result<String> {
        (**self).evaluate(expression)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

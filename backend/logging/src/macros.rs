/// Generates the level-named convenience methods on any type exposing
/// `write_at(level, message, context)`.
macro_rules! level_methods {
    ($($method:ident => $level:ident),* $(,)?) => {
        $(
            pub fn $method(
                &self,
                message: impl Into<daylog_core::Message>,
                context: daylog_core::Context,
            ) -> daylog_core::Result<()> {
                self.write_at(daylog_core::Level::$level, message.into(), context)
            }
        )*
    };
}

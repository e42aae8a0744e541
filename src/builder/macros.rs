//! Macros for ergonomic state and event declaration.

/// Generate a state id enum and its `StateId` implementation.
///
/// # Example
///
/// ```
/// use statechart::state_enum;
/// use statechart::core::StateId;
///
/// state_enum! {
///     pub enum Player {
///         Stopped,
///         Playing,
///         Paused,
///     }
/// }
///
/// assert_eq!(Player::Paused.name(), "Paused");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::StateId for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

/// Generate an event enum and its `Event` implementation.
///
/// # Example
///
/// ```
/// use statechart::event_enum;
/// use statechart::core::Event;
///
/// event_enum! {
///     pub enum PlayerEvent {
///         Play,
///         Pause,
///         Stop,
///     }
/// }
///
/// assert_eq!(PlayerEvent::Stop.name(), "Stop");
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Event for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

//! Plugin Registration
//!
//! Capability plugins are configured once and then bound to every inbound
//! turn. The binding borrows the turn, so a capability can read the request
//! snapshot and mutate the scratchpad without the host giving up ownership.

use crate::turn::Turn;

/// A plugin that attaches a capability to each inbound turn.
///
/// `D` is the session scratchpad type the capability operates on. Hosts
/// register a plugin once (holding its configuration and any long-lived
/// clients) and call [`TurnPlugin::attach`] per turn; the returned
/// capability lives no longer than the turn it is bound to.
pub trait TurnPlugin<D> {
    /// Capability handle bound to one turn.
    type Capability<'t>
    where
        Self: 't,
        D: 't;

    /// Bind this plugin to a turn.
    fn attach<'t>(&'t self, turn: &'t mut Turn<D>) -> Self::Capability<'t>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turn::TurnRequest;

    struct CounterPlugin;

    struct Counter<'t> {
        turn: &'t mut Turn<u32>,
    }

    impl Counter<'_> {
        fn bump(&mut self) -> u32 {
            self.turn.data += 1;
            self.turn.data
        }
    }

    impl TurnPlugin<u32> for CounterPlugin {
        type Capability<'t>
            = Counter<'t>
        where
            Self: 't,
            u32: 't;

        fn attach<'t>(&'t self, turn: &'t mut Turn<u32>) -> Counter<'t> {
            Counter { turn }
        }
    }

    #[test]
    fn test_capability_mutates_scratchpad_across_attaches() {
        let plugin = CounterPlugin;
        let mut turn = Turn::new(TurnRequest::default(), 0);

        plugin.attach(&mut turn).bump();
        plugin.attach(&mut turn).bump();

        assert_eq!(turn.data, 2);
    }
}

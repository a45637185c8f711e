//! Demo commands loaded into the console registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use cmdbind_engine::{
    ArgSpec, CommandBuilder, CommandRegistry, DefaultValue, MultiWord, Optional, Outcome, Range,
    Rename, Result, TreeBuilder, Value,
};

/// Permission required to take coins away.
pub const COINS_ADMIN: &str = "coins.admin";

/// Coin balances by sender name.
#[derive(Default)]
pub struct Wallet {
    balances: Mutex<HashMap<String, i64>>,
}

impl Wallet {
    pub fn balance(&self, who: &str) -> i64 {
        self.balances
            .lock()
            .map(|b| b.get(who).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn adjust(&self, who: &str, delta: i64) -> std::result::Result<i64, String> {
        let mut balances = self
            .balances
            .lock()
            .map_err(|_| "wallet lock poisoned".to_string())?;
        let entry = balances.entry(who.to_string()).or_insert(0);
        if *entry + delta < 0 {
            return Err(format!("{who} only has {} coins", *entry));
        }
        *entry += delta;
        Ok(*entry)
    }
}

/// Linear congruential step seeded from the clock. Works in `i128` so the
/// full `i64` range is a valid span.
fn roll(min: i64, max: i64, seed: &mut u64) -> i64 {
    *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    let (min, max) = (i128::from(min), i128::from(max));
    let span = (max - min + 1).max(1) as u128;
    let offset = (u128::from(*seed) % span) as i128;
    (min + offset).clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

/// Register `dice`, `coins`, `say`, `mode` and `help`.
pub fn register_demo(registry: &mut CommandRegistry, wallet: Arc<Wallet>) -> Result<()> {
    registry.register(
        CommandBuilder::new("dice")
            .aliases(["roll", "d"])
            .description("Roll dice between min and max")
            .arg(ArgSpec::int("min").with(DefaultValue::new(1)))
            .arg(ArgSpec::int("max").with(DefaultValue::new(6)))
            .arg(
                ArgSpec::int("rolls")
                    .with(DefaultValue::new(1))
                    .with(Range::new(1.0, 20.0)),
            )
            .handler(|inv| {
                let min = inv.int("min").unwrap_or(1);
                let max = inv.int("max").unwrap_or(6);
                if min > max {
                    return Err(format!("min {min} is above max {max}"));
                }
                let mut seed = clock_seed();
                let rolls: Vec<String> = (0..inv.int("rolls").unwrap_or(1))
                    .map(|_| roll(min, max, &mut seed).to_string())
                    .collect();
                inv.sender().send_message(&format!("Rolled {}", rolls.join(", ")));
                Ok(Outcome::success())
            }),
    )?;

    let add_wallet = Arc::clone(&wallet);
    let take_wallet = Arc::clone(&wallet);
    let show_wallet = wallet;
    registry.register_tree(
        TreeBuilder::new("coins")
            .alias("money")
            .description("Manage your coins")
            .child(
                CommandBuilder::new("add")
                    .alias("give")
                    .arg(ArgSpec::int("amount").with(Range::at_least(1.0)))
                    .handler(move |inv| {
                        let who = inv.sender().name();
                        add_wallet
                            .adjust(who, inv.int("amount").unwrap_or(0))
                            .map(|total| format!("{who} now has {total} coins"))
                    }),
            )
            .child(
                CommandBuilder::new("take")
                    .permission(COINS_ADMIN)
                    .no_permission_message("Only treasurers can take coins.")
                    .arg(ArgSpec::int("amount").with(Range::at_least(1.0)))
                    .handler(move |inv| {
                        let who = inv.sender().name();
                        take_wallet
                            .adjust(who, -inv.int("amount").unwrap_or(0))
                            .map(|total| format!("{who} now has {total} coins"))
                    }),
            )
            .default_child(
                CommandBuilder::new("balance")
                    .arg(ArgSpec::string("who").with(Optional))
                    .run(move |inv| {
                        let who = inv.string("who").unwrap_or(inv.sender().name());
                        show_wallet.balance(who)
                    }),
            ),
    )?;

    registry.register(
        CommandBuilder::new("say")
            .alias("echo")
            .description("Repeat a message")
            .arg(ArgSpec::string("text").with(MultiWord).with(Rename::new("message")))
            .run(|inv| inv.string("message").unwrap_or_default().to_string()),
    )?;

    registry.register(
        CommandBuilder::new("mode")
            .description("Pick a difficulty")
            .arg(
                ArgSpec::choice("level", ["easy", "normal", "hard"])
                    .with(DefaultValue::new("normal")),
            )
            .run(|inv| {
                let level = inv.get("level").and_then(Value::as_str).unwrap_or("normal");
                Outcome::success_with(format!("Difficulty set to {level}"))
            }),
    )?;

    let mut listing: Vec<String> = registry
        .commands()
        .into_iter()
        .map(|c| format!("{:<32} {}", c.usage, c.description))
        .collect();
    listing.push(format!("{:<32} {}", "help", "List commands"));
    registry.register(
        CommandBuilder::new("help")
            .alias("?")
            .description("List commands")
            .run(move |inv| {
                for line in &listing {
                    inv.sender().send_message(line);
                }
            }),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use cmdbind_engine::{CmdError, Sender};

    use super::*;

    struct Player {
        name: &'static str,
        treasurer: bool,
        lines: Mutex<Vec<String>>,
    }

    impl Player {
        fn new(name: &'static str, treasurer: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                treasurer,
                lines: Mutex::new(Vec::new()),
            })
        }
    }

    impl Sender for Player {
        fn name(&self) -> &str {
            self.name
        }

        fn send_message(&self, msg: &str) {
            self.lines.lock().unwrap().push(msg.to_string());
        }

        fn has_permission(&self, permission: &str) -> bool {
            permission != COINS_ADMIN || self.treasurer
        }
    }

    fn setup() -> (CommandRegistry, Arc<Wallet>) {
        let wallet = Arc::new(Wallet::default());
        let mut reg = CommandRegistry::new();
        register_demo(&mut reg, Arc::clone(&wallet)).unwrap();
        (reg, wallet)
    }

    #[test]
    fn dice_rolls_within_bounds() {
        let (reg, _) = setup();
        let p = Player::new("ann", false);
        assert!(reg.execute(Arc::<Player>::clone(&p), "dice 3 3 2").unwrap().success);
        assert_eq!(*p.lines.lock().unwrap(), vec!["Rolled 3, 3"]);
    }

    #[test]
    fn roll_handles_full_range() {
        let mut seed = 42;
        for _ in 0..100 {
            let n = roll(0, i64::MAX, &mut seed);
            assert!(n >= 0);
            roll(i64::MIN, i64::MAX, &mut seed);
            assert_eq!(roll(i64::MIN, i64::MIN, &mut seed), i64::MIN);
            assert_eq!(roll(i64::MAX, i64::MAX, &mut seed), i64::MAX);
            let small = roll(-3, 3, &mut seed);
            assert!((-3..=3).contains(&small));
        }
    }

    #[test]
    fn dice_with_extreme_bounds() {
        let (reg, _) = setup();
        let p = Player::new("ann", false);
        let out = reg.execute(Arc::<Player>::clone(&p), "dice 0 9223372036854775807");
        assert!(out.unwrap().success);
        let out = reg.execute(
            Arc::<Player>::clone(&p),
            "dice -9223372036854775808 9223372036854775807 3",
        );
        assert!(out.unwrap().success);
        assert_eq!(p.lines.lock().unwrap().len(), 2);
    }

    #[test]
    fn dice_rejects_inverted_bounds() {
        let (reg, _) = setup();
        let err = reg.execute(Player::new("ann", false), "dice 6 1").unwrap_err();
        assert!(matches!(err, CmdError::HandlerFailure(_)));
    }

    #[test]
    fn coins_flow() {
        let (reg, wallet) = setup();
        let ann = Player::new("ann", true);
        let out = reg.execute(Arc::<Player>::clone(&ann), "coins add 10").unwrap();
        assert_eq!(out.message.as_deref(), Some("ann now has 10 coins"));
        reg.execute(Arc::<Player>::clone(&ann), "money take 4").unwrap();
        assert_eq!(wallet.balance("ann"), 6);
        let err = reg.execute(Arc::<Player>::clone(&ann), "coins").unwrap_err();
        assert_eq!(err.to_string(), "Missing argument sub command (sub command)");
        assert_eq!(reg.execute(ann, "coins ann").unwrap().code, 6);
    }

    #[test]
    fn taking_needs_permission() {
        let (reg, _) = setup();
        let err = reg.execute(Player::new("bob", false), "coins take 1").unwrap_err();
        assert_eq!(err.to_string(), "Only treasurers can take coins.");
    }

    #[test]
    fn overdraw_is_handler_failure() {
        let (reg, _) = setup();
        let err = reg.execute(Player::new("cat", true), "coins take 1").unwrap_err();
        assert_eq!(err.to_string(), "command failed: cat only has 0 coins");
    }

    #[test]
    fn say_keeps_whole_message() {
        let (reg, _) = setup();
        let out = reg.execute(Player::new("ann", false), "echo hi  there").unwrap();
        assert_eq!(out.message.as_deref(), Some("hi  there"));
    }

    #[test]
    fn mode_defaults_and_matches_case() {
        let (reg, _) = setup();
        let p = Player::new("ann", false);
        let out = reg.execute(Arc::<Player>::clone(&p), "mode").unwrap();
        assert_eq!(out.message.as_deref(), Some("Difficulty set to normal"));
        let out = reg.execute(p, "mode HARD").unwrap();
        assert_eq!(out.message.as_deref(), Some("Difficulty set to hard"));
    }

    #[test]
    fn help_lists_every_command() {
        let (reg, _) = setup();
        let p = Player::new("ann", false);
        reg.execute(Arc::<Player>::clone(&p), "?").unwrap();
        let lines = p.lines.lock().unwrap();
        assert_eq!(lines.len(), reg.len());
        assert!(lines[0].starts_with("dice [min] [max] [rolls]"));
    }
}

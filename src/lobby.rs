//! In-memory lobby store.
//!
//! A lobby pairs one game session with the ids of the (at most two) players
//! seated in it. The map of lobbies sits behind one `RwLock` and every lobby
//! behind its own, so actions in different lobbies never contend beyond the
//! brief map lookup.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use rand::distributions::{Alphanumeric, DistString};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::{GameState, PlayerId, RuleConfig, PLAYER_COUNT};
use crate::snapshot::GameSoa;
use crate::wire::{respond, ActionRequest, ActionResponse};

/// Length of a lobby id.
pub const LOBBY_ID_LEN: usize = 6;

/// Length of a player id.
pub const PLAYER_ID_LEN: usize = 16;

const LOBBY_ID_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a fresh opaque player id.
#[must_use]
pub fn new_player_id() -> String {
    Alphanumeric.sample_string(&mut rand::thread_rng(), PLAYER_ID_LEN)
}

fn new_lobby_id<R: Rng>(rng: &mut R) -> String {
    (0..LOBBY_ID_LEN)
        .map(|_| char::from(LOBBY_ID_CHARS[rng.gen_range(0..LOBBY_ID_CHARS.len())]))
        .collect()
}

/// Lobby store errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyError {
    /// No lobby has this id.
    UnknownLobby(String),
    /// Both seats are taken by other players.
    LobbyFull(String),
    /// The player holds no seat in the lobby.
    NotSeated {
        /// Lobby id.
        lobby: String,
        /// Player id.
        player: String,
    },
    /// The second seat is still empty.
    WaitingForOpponent(String),
    /// A lock was poisoned by a panicking writer.
    Poisoned,
}

impl fmt::Display for LobbyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownLobby(lobby) => write!(f, "invalid lobby id {lobby:?}"),
            Self::LobbyFull(lobby) => write!(f, "lobby {lobby} is full"),
            Self::NotSeated { lobby, player } => {
                write!(f, "player {player:?} is not seated in lobby {lobby}")
            }
            Self::WaitingForOpponent(lobby) => {
                write!(f, "lobby {lobby} is waiting for a second player")
            }
            Self::Poisoned => write!(f, "lobby lock poisoned"),
        }
    }
}

impl std::error::Error for LobbyError {}

/// Reply to a lobby creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLobby {
    /// Id of the new lobby.
    pub lobby_id: String,
    /// Initial snapshot.
    pub game_soa: GameSoa,
}

/// Reply to a join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinResponse {
    /// Always true; failures are errors.
    pub ok: bool,
    /// Current snapshot.
    pub game_soa: GameSoa,
    /// Seat of the joining player.
    pub player_index: PlayerId,
}

#[derive(Debug)]
struct Lobby {
    game: GameState,
    players: Vec<String>,
    last_access: Instant,
}

impl Lobby {
    fn seat_of(&self, player: &str) -> Option<PlayerId> {
        let seat = self.players.iter().position(|seated| seated == player)?;
        PlayerId::try_from(seat).ok()
    }
}

/// Thread-safe map from lobby id to session.
#[derive(Debug)]
pub struct LobbyStore {
    lobbies: RwLock<HashMap<String, Arc<RwLock<Lobby>>>>,
    rng: Mutex<SmallRng>,
    rules: RuleConfig,
}

impl Default for LobbyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LobbyStore {
    /// Create an empty store seeded from the OS.
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(SmallRng::from_entropy())
    }

    /// Create an empty store whose lobby ids and boards derive from `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    fn from_rng(rng: SmallRng) -> Self {
        Self {
            lobbies: RwLock::new(HashMap::new()),
            rng: Mutex::new(rng),
            rules: RuleConfig::default(),
        }
    }

    /// Apply `rules` to every lobby created from now on.
    #[must_use]
    pub fn with_rules(mut self, rules: RuleConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Number of open lobbies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lobbies.read().map_or(0, |lobbies| lobbies.len())
    }

    /// Whether no lobby is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lobby(&self, lobby_id: &str) -> Result<Arc<RwLock<Lobby>>, LobbyError> {
        let lobbies = self.lobbies.read().map_err(|_| LobbyError::Poisoned)?;
        lobbies
            .get(lobby_id)
            .cloned()
            .ok_or_else(|| LobbyError::UnknownLobby(lobby_id.to_string()))
    }

    /// Open a lobby with a fresh game and seat `player_id` in it.
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::Poisoned`] if a lock is poisoned.
    pub fn create(&self, player_id: &str) -> Result<NewLobby, LobbyError> {
        let mut rng = self.rng.lock().map_err(|_| LobbyError::Poisoned)?;
        let game = GameState::with_rng(&mut *rng).with_rules(self.rules);
        let game_soa = GameSoa::from(&game);

        let mut lobbies = self.lobbies.write().map_err(|_| LobbyError::Poisoned)?;
        let mut lobby_id = new_lobby_id(&mut *rng);
        while lobbies.contains_key(&lobby_id) {
            lobby_id = new_lobby_id(&mut *rng);
        }
        drop(rng);

        let lobby = Lobby {
            game,
            players: vec![player_id.to_string()],
            last_access: Instant::now(),
        };
        lobbies.insert(lobby_id.clone(), Arc::new(RwLock::new(lobby)));
        drop(lobbies);

        tracing::info!(lobby = %lobby_id, "lobby created");
        Ok(NewLobby { lobby_id, game_soa })
    }

    /// Seat `player_id` in a lobby. Re-joining returns the existing seat.
    ///
    /// # Errors
    ///
    /// Returns an error if the lobby does not exist or both seats belong to
    /// other players.
    pub fn join(&self, lobby_id: &str, player_id: &str) -> Result<JoinResponse, LobbyError> {
        let lobby = self.lobby(lobby_id)?;
        let mut lobby = lobby.write().map_err(|_| LobbyError::Poisoned)?;

        let seat = match lobby.seat_of(player_id) {
            Some(seat) => seat,
            None if lobby.players.len() >= PLAYER_COUNT => {
                return Err(LobbyError::LobbyFull(lobby_id.to_string()));
            }
            None => {
                let seat = PlayerId::try_from(lobby.players.len())
                    .map_err(|_| LobbyError::LobbyFull(lobby_id.to_string()))?;
                lobby.players.push(player_id.to_string());
                tracing::info!(lobby = %lobby_id, seat, "player joined");
                seat
            }
        };
        lobby.last_access = Instant::now();

        Ok(JoinResponse {
            ok: true,
            game_soa: GameSoa::from(&lobby.game),
            player_index: seat,
        })
    }

    /// Submit an action for `player_id`.
    ///
    /// Rule violations are not errors: they come back as `ok: false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lobby does not exist, has only one player, or
    /// the player is not seated in it.
    pub fn act(
        &self,
        lobby_id: &str,
        player_id: &str,
        request: &ActionRequest,
    ) -> Result<ActionResponse, LobbyError> {
        let lobby = self.lobby(lobby_id)?;
        let mut lobby = lobby.write().map_err(|_| LobbyError::Poisoned)?;

        if lobby.players.len() < PLAYER_COUNT {
            return Err(LobbyError::WaitingForOpponent(lobby_id.to_string()));
        }
        let seat = lobby.seat_of(player_id).ok_or_else(|| LobbyError::NotSeated {
            lobby: lobby_id.to_string(),
            player: player_id.to_string(),
        })?;

        lobby.last_access = Instant::now();
        Ok(respond(&mut lobby.game, seat, request))
    }

    /// Current snapshot of a lobby. Does not count as activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the lobby does not exist.
    pub fn read(&self, lobby_id: &str) -> Result<GameSoa, LobbyError> {
        let lobby = self.lobby(lobby_id)?;
        let lobby = lobby.read().map_err(|_| LobbyError::Poisoned)?;
        Ok(GameSoa::from(&lobby.game))
    }

    /// Drop lobbies with no join or action for longer than `max_idle`.
    ///
    /// Returns the number of lobbies removed. A lobby whose own lock is
    /// poisoned can no longer be played and is removed too.
    ///
    /// # Errors
    ///
    /// Returns [`LobbyError::Poisoned`] if the lobby map lock is poisoned.
    pub fn evict_idle(&self, max_idle: Duration) -> Result<usize, LobbyError> {
        let mut lobbies = self.lobbies.write().map_err(|_| LobbyError::Poisoned)?;
        let before = lobbies.len();
        lobbies.retain(|_, lobby| {
            lobby
                .read()
                .is_ok_and(|lobby| lobby.last_access.elapsed() <= max_idle)
        });
        let evicted = before - lobbies.len();
        if evicted > 0 {
            tracing::info!(evicted, remaining = lobbies.len(), "evicted idle lobbies");
        }
        Ok(evicted)
    }
}

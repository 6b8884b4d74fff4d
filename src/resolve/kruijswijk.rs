//! Kruijswijk guess-and-check resolution algorithm.
//!
//! Every order starts unresolved. Resolving one order may require resolving
//! others; when that recursion reaches an order that is itself being guessed,
//! the current guess is returned and the order is pushed onto a shared
//! dependency stack. The order that closes the loop re-runs its adjudication
//! with the opposite guess: if both runs agree the result stands, otherwise
//! the loop is a paradox and the backup rule settles it.

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, trace, warn};

use crate::board::{Board, BoardError, CoastId, Location, Order, ProvinceId, UnitId, UnitType};
use crate::options::AdjudicationOptions;
use crate::validity::unit_order_is_valid;

use super::adjudicable::{AdjudicableOrder, OrderKind, Resolution, ResolutionState};
use super::outcome::{Adjudication, DislodgedUnit, InvalidOrder, OrderResult, ResolvedOrder};

/// Fatal problems that abort a run before the board is changed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdjudicationError {
    #[error("{count} orders are still unresolved")]
    Unresolved { count: usize },

    #[error("unit {unit} carries {order:?}, which does not belong to this phase")]
    UnexpectedOrder { unit: UnitId, order: Order },

    #[error("unit {unit} is recorded in '{province}' but does not occupy it")]
    Misplaced { unit: UnitId, province: String },

    #[error("retreat from '{0}' is still pending")]
    PendingRetreat(String),

    #[error("inconsistent board: {0}")]
    Board(#[from] BoardError),
}

/// One movement-phase adjudication over a borrowed board.
///
/// Construction validates orders and builds the order set; [`run`](Self::run)
/// resolves every order and writes the results back.
pub struct Adjudicator<'a> {
    board: &'a mut Board,
    options: AdjudicationOptions,
    orders: Vec<AdjudicableOrder>,
    /// Order index of the unit standing in each province.
    by_province: Vec<Option<usize>>,
    moves_by_destination: Vec<Vec<usize>>,
    dependencies: Vec<usize>,
    invalid: Vec<InvalidOrder>,
}

impl<'a> Adjudicator<'a> {
    /// Validates the board's orders, downgrading invalid ones to hold, and
    /// builds the order set.
    pub fn new(board: &'a mut Board, options: AdjudicationOptions) -> Result<Self, AdjudicationError> {
        check_structure(board)?;
        let invalid = downgrade_invalid_orders(board, options.strict_orders);

        let province_count = board.province_count();
        let mut orders = Vec::new();
        let mut by_province = vec![None; province_count];
        let mut moves_by_destination = vec![Vec::new(); province_count];

        for unit in board.standing_units() {
            let order = board.unit(unit).and_then(|u| u.order).unwrap_or(Order::Hold);
            let Some(adj) = AdjudicableOrder::new(board, unit, &order) else {
                continue;
            };
            by_province[adj.current_province.index()] = Some(orders.len());
            if let (true, Some(dest)) = (adj.is_move(), adj.destination_province) {
                moves_by_destination[dest.index()].push(orders.len());
            }
            orders.push(adj);
        }

        for i in 0..orders.len() {
            let (kind, source, dest) = (orders[i].kind, orders[i].source_province, orders[i].destination_province);
            let Some(target) = source.and_then(|s| by_province[s.index()]) else {
                continue;
            };
            let t = &orders[target];
            match kind {
                OrderKind::Support => {
                    let matches = if t.is_move() {
                        t.destination_province == dest
                    } else {
                        dest == Some(t.current_province)
                    };
                    if matches {
                        orders[target].supports.push(i);
                    }
                }
                OrderKind::Convoy => {
                    if t.is_move() && t.requires_convoy && t.destination_province == dest {
                        orders[target].convoys.push(i);
                    }
                }
                OrderKind::Hold | OrderKind::Core | OrderKind::Move => {}
            }
        }

        Ok(Adjudicator {
            board,
            options,
            orders,
            by_province,
            moves_by_destination,
            dependencies: Vec::new(),
            invalid,
        })
    }

    /// The order set, in province order.
    pub fn orders(&self) -> &[AdjudicableOrder] {
        &self.orders
    }

    /// Orders replaced by hold during construction.
    pub fn invalid_orders(&self) -> &[InvalidOrder] {
        &self.invalid
    }

    /// Resolves every order.
    pub fn resolve_all(&mut self) {
        for idx in 0..self.orders.len() {
            self.resolve_order(idx);
        }
    }

    /// Resolves every order and applies the results to the board.
    pub fn run(mut self) -> Result<Adjudication, AdjudicationError> {
        self.resolve_all();
        self.update_board()
    }

    fn set_guess(&mut self, idx: usize, guess: Resolution) {
        self.orders[idx].state = ResolutionState::Guessing;
        self.orders[idx].resolution = guess;
    }

    fn settle(&mut self, idx: usize, resolution: Resolution) -> Resolution {
        self.orders[idx].state = ResolutionState::Resolved;
        self.orders[idx].resolution = resolution;
        resolution
    }

    /// Drops every dependency recorded since `snapshot`, making those orders
    /// unresolved again.
    fn reset_dependencies(&mut self, snapshot: usize) {
        for &dep in &self.dependencies[snapshot..] {
            self.orders[dep].state = ResolutionState::Unresolved;
        }
        self.dependencies.truncate(snapshot);
    }

    fn resolve_order(&mut self, idx: usize) -> Resolution {
        match self.orders[idx].state {
            ResolutionState::Resolved => return self.orders[idx].resolution,
            ResolutionState::Guessing => {
                if !self.dependencies.contains(&idx) {
                    self.dependencies.push(idx);
                }
                return self.orders[idx].resolution;
            }
            ResolutionState::Unresolved => {}
        }

        let snapshot = self.dependencies.len();
        self.set_guess(idx, Resolution::Fails);
        let first = self.adjudicate_order(idx);
        if self.orders[idx].is_resolved() {
            // Settled by a backup rule deeper in the recursion.
            return self.orders[idx].resolution;
        }
        if self.dependencies.len() == snapshot {
            return self.settle(idx, first);
        }
        if self.dependencies[snapshot] != idx {
            // Depends on a guess made further up the stack.
            if !self.dependencies.contains(&idx) {
                self.dependencies.push(idx);
            }
            self.orders[idx].resolution = first;
            return first;
        }

        self.reset_dependencies(snapshot);
        self.set_guess(idx, Resolution::Succeeds);
        let second = self.adjudicate_order(idx);
        if self.orders[idx].is_resolved() {
            return self.orders[idx].resolution;
        }
        if self.dependencies.len() == snapshot {
            return self.settle(idx, second);
        }
        if first == second {
            self.reset_dependencies(snapshot);
            return self.settle(idx, first);
        }

        trace!(unit = %self.orders[idx].unit, "guesses disagree");
        self.backup_rule(snapshot);
        self.resolve_order(idx)
    }

    fn adjudicate_order(&mut self, idx: usize) -> Resolution {
        match self.orders[idx].kind {
            OrderKind::Hold => Resolution::Succeeds,
            OrderKind::Core | OrderKind::Support => self.adjudicate_stationary(idx),
            OrderKind::Convoy => self.adjudicate_convoy(idx),
            OrderKind::Move => self.adjudicate_move(idx),
        }
    }

    /// A core or support fails when a foreign unit moves against its province.
    /// The unit a support is directed against only cuts it by succeeding, and
    /// a convoyed attacker only cuts through a working convoy. For a support
    /// to move, that convoy may not pass through the province under attack.
    fn adjudicate_stationary(&mut self, idx: usize) -> Resolution {
        let o = &self.orders[idx];
        let (province, country) = (o.current_province, o.country);
        let target = match o.kind {
            OrderKind::Support => o.destination_province,
            _ => None,
        };
        let exclude = target.filter(|&t| o.source_province != Some(t));

        let attackers = self.moves_by_destination[province.index()].clone();
        for m in attackers {
            let attacker = &self.orders[m];
            if attacker.country == country {
                continue;
            }
            let cuts = if attacker.requires_convoy {
                self.convoy_chain(m, exclude).succeeded()
            } else if Some(attacker.current_province) == target {
                self.resolve_order(m).succeeded()
            } else {
                true
            };
            if cuts {
                return Resolution::Fails;
            }
        }
        Resolution::Succeeds
    }

    /// A convoy fails when its fleet is dislodged.
    fn adjudicate_convoy(&mut self, idx: usize) -> Resolution {
        let province = self.orders[idx].current_province;
        let attackers = self.moves_by_destination[province.index()].clone();
        for m in attackers {
            if self.resolve_order(m).succeeded() {
                return Resolution::Fails;
            }
        }
        Resolution::Succeeds
    }

    fn adjudicate_move(&mut self, idx: usize) -> Resolution {
        let o = &self.orders[idx];
        let (origin, country, requires_convoy) = (o.current_province, o.country, o.requires_convoy);
        let Some(dest) = o.destination_province else {
            return Resolution::Fails;
        };
        let guard = self.options.forbid_self_dislodgement;

        if requires_convoy && !self.convoy_chain(idx, None).succeeded() {
            return Resolution::Fails;
        }

        let mut to_overcome: Vec<usize> = self.moves_by_destination[dest.index()]
            .iter()
            .copied()
            .filter(|&m| m != idx)
            .collect();
        let mut moving_away = None;

        if let Some(occ) = self.by_province[dest.index()] {
            let occupant = &self.orders[occ];
            let same_country = occupant.country == country;
            if !occupant.is_move() {
                if same_country && guard {
                    return Resolution::Fails;
                }
                to_overcome.push(occ);
            } else if occupant.destination_province == Some(origin)
                && !requires_convoy
                && !occupant.requires_convoy
            {
                // Head-to-head battle. A convoyed swap passes by instead.
                if same_country && guard {
                    return Resolution::Fails;
                }
                to_overcome.push(occ);
            } else {
                moving_away = Some(occ);
            }
        }

        if let Some(away) = moving_away {
            if guard
                && self.orders[away].country == country
                && !self.resolve_order(away).succeeded()
            {
                return Resolution::Fails;
            }
        }

        if to_overcome.is_empty() && moving_away.is_none() {
            return Resolution::Succeeds;
        }

        // A country's supports never help dislodge its own unit. They are
        // withheld while the destination's occupant stays put.
        let supports = self.orders[idx].supports.clone();
        let mut withheld = match (self.by_province[dest.index()], moving_away) {
            (Some(occ), None) => Some(self.orders[occ].country),
            _ => None,
        };
        if let Some(away) = moving_away {
            let away_country = self.orders[away].country;
            if away_country != country
                && supports.iter().any(|&s| self.orders[s].country == away_country)
                && !self.resolve_order(away).succeeded()
            {
                withheld = Some(away_country);
            }
        }
        if withheld == Some(country) {
            withheld = None;
        }

        let max_needed = to_overcome
            .iter()
            .map(|&c| 1 + self.orders[c].supports.len())
            .max()
            .unwrap_or(1);

        let mut strength = 1;
        for s in supports {
            if Some(self.orders[s].country) == withheld {
                continue;
            }
            if self.resolve_order(s).succeeded() {
                strength += 1;
                if strength > max_needed {
                    return Resolution::Succeeds;
                }
            }
        }

        if strength == 1 {
            if let Some(away) = moving_away {
                if !self.resolve_order(away).succeeded() {
                    return Resolution::Fails;
                }
            }
        }

        for c in to_overcome {
            let competitor = &self.orders[c];
            if 1 + competitor.supports.len() < strength {
                continue;
            }
            if competitor.requires_convoy && !self.convoy_chain(c, None).succeeded() {
                continue;
            }
            if let Some(away) = moving_away {
                // Beaten head-to-head by the unit leaving the destination.
                let leaving = &self.orders[away];
                let head_to_head = leaving.destination_province == Some(self.orders[c].current_province)
                    && !leaving.requires_convoy
                    && !self.orders[c].requires_convoy;
                if head_to_head && self.resolve_order(away).succeeded() {
                    continue;
                }
            }
            if strength == 1 {
                return Resolution::Fails;
            }
            let mut competitor_strength = 1;
            let competitor_supports = self.orders[c].supports.clone();
            for s in competitor_supports {
                if self.resolve_order(s).succeeded() {
                    competitor_strength += 1;
                }
            }
            if strength <= competitor_strength {
                return Resolution::Fails;
            }
        }

        Resolution::Succeeds
    }

    /// Breadth-first search from the army through its convoys that resolve
    /// successfully, ending at any fleet adjacent to the destination.
    /// Fleets in `exclude` are skipped.
    fn convoy_chain(&mut self, idx: usize, exclude: Option<ProvinceId>) -> Resolution {
        let start = self.orders[idx].current_province;
        let Some(dest) = self.orders[idx].destination_province else {
            return Resolution::Fails;
        };
        let convoys = self.orders[idx].convoys.clone();

        let mut visited = BTreeSet::from([start]);
        visited.extend(exclude);
        let mut queue = VecDeque::from([start]);
        while let Some(p) = queue.pop_front() {
            let adjacent = &self.board.province(p).adjacent;
            if p != start && adjacent.contains(&dest) {
                return Resolution::Succeeds;
            }
            let next: Vec<(usize, ProvinceId)> = convoys
                .iter()
                .map(|&c| (c, self.orders[c].current_province))
                .filter(|(_, at)| !visited.contains(at) && adjacent.contains(at))
                .collect();
            for (c, at) in next {
                if !visited.insert(at) {
                    continue;
                }
                if self.resolve_order(c).succeeded() {
                    queue.push_back(at);
                }
            }
        }
        Resolution::Fails
    }

    /// Settles a paradox among the orders pushed since `snapshot`.
    ///
    /// A paradox involving a move into a convoying fleet's province is a
    /// convoy paradox: every convoy and convoyed move in it fails (Szykman).
    /// Otherwise it is circular movement and every move in it succeeds. If
    /// the chosen rule finds nothing to settle the other one is tried, and
    /// failing that the current guesses become final.
    fn backup_rule(&mut self, snapshot: usize) {
        let paradox = self.dependencies.split_off(snapshot);
        let convoy_paradox = paradox.iter().any(|&i| {
            let o = &self.orders[i];
            o.is_move()
                && o.destination_province
                    .and_then(|d| self.by_province[d.index()])
                    .is_some_and(|j| self.orders[j].kind == OrderKind::Convoy)
        });
        let units: Vec<UnitId> = paradox.iter().map(|&i| self.orders[i].unit).collect();
        let rule = if convoy_paradox { "szykman" } else { "circular movement" };
        warn!(?units, rule, "paradox in order set");

        let settled = if convoy_paradox {
            self.apply_szykman(&paradox) || self.apply_circular(&paradox)
        } else {
            self.apply_circular(&paradox) || self.apply_szykman(&paradox)
        };
        if !settled {
            for &i in &paradox {
                self.orders[i].state = ResolutionState::Resolved;
            }
        }
    }

    fn apply_szykman(&mut self, paradox: &[usize]) -> bool {
        let mut settled = false;
        for &i in paradox {
            let o = &mut self.orders[i];
            if o.kind == OrderKind::Convoy || (o.is_move() && o.requires_convoy) {
                o.state = ResolutionState::Resolved;
                o.resolution = Resolution::Fails;
                settled = true;
            } else {
                o.state = ResolutionState::Unresolved;
            }
        }
        settled
    }

    fn apply_circular(&mut self, paradox: &[usize]) -> bool {
        let mut settled = false;
        for &i in paradox {
            let o = &mut self.orders[i];
            if o.is_move() {
                o.state = ResolutionState::Resolved;
                o.resolution = Resolution::Succeeds;
                settled = true;
            } else {
                o.state = ResolutionState::Unresolved;
            }
        }
        settled
    }

    /// Failed moves per destination, not counting convoyed armies whose
    /// convoy was disrupted.
    fn bounced_attempts(&mut self) -> Vec<usize> {
        let mut attempts = vec![0; self.board.province_count()];
        for idx in 0..self.orders.len() {
            let o = &self.orders[idx];
            if !o.is_move() || o.resolution.succeeded() {
                continue;
            }
            let Some(dest) = o.destination_province else {
                continue;
            };
            if o.requires_convoy && !self.convoy_chain(idx, None).succeeded() {
                continue;
            }
            attempts[dest.index()] += 1;
        }
        attempts
    }

    /// Applies the resolutions to the board and clears every order.
    ///
    /// Fails without touching unit positions if any order is unresolved.
    pub fn update_board(mut self) -> Result<Adjudication, AdjudicationError> {
        let count = self.orders.iter().filter(|o| !o.is_resolved()).count();
        if count > 0 {
            return Err(AdjudicationError::Unresolved { count });
        }
        let attempts = self.bounced_attempts();
        let Adjudicator {
            board,
            options,
            orders,
            invalid,
            ..
        } = self;

        let mut outcomes: Vec<ResolvedOrder> = orders
            .iter()
            .map(|o| ResolvedOrder {
                unit: o.unit,
                player: o.country,
                order: board.unit(o.unit).and_then(|u| u.order).unwrap_or(Order::Hold),
                result: order_result(o),
            })
            .collect();

        for o in orders.iter().filter(|o| o.kind == OrderKind::Core && o.resolution.succeeded()) {
            let p = board.province_mut(o.current_province);
            if p.core == Some(o.country) {
                continue;
            }
            if p.half_core == Some(o.country) {
                p.core = Some(o.country);
                p.half_core = None;
            } else {
                p.half_core = Some(o.country);
            }
        }

        let arrivals: Vec<(&AdjudicableOrder, ProvinceId, Option<CoastId>)> = orders
            .iter()
            .filter(|o| o.is_move() && o.resolution.succeeded())
            .filter_map(|o| {
                let dest = o.destination_province?;
                let coast = arrival_coast(board, o.unit, o.raw_destination?, dest);
                Some((o, dest, coast))
            })
            .collect();

        for &(o, _, _) in &arrivals {
            let p = board.province_mut(o.current_province);
            if p.unit == Some(o.unit) {
                p.unit = None;
            }
        }

        let mut dislodged = Vec::new();
        for &(o, dest, coast) in &arrivals {
            let p = board.province_mut(dest);
            if let Some(occupant) = p.unit.take() {
                p.dislodged_unit = Some(occupant);
                dislodged.push((occupant, dest, o.current_province, o.requires_convoy));
            }
            p.unit = Some(o.unit);
            if let Some(u) = board.unit_mut(o.unit) {
                u.province = dest;
                u.coast = coast;
            }
            debug!(unit = %o.unit, to = %board.province(dest).name, "unit moved");
        }

        let standoffs: BTreeSet<ProvinceId> = board
            .province_ids()
            .filter(|&p| attempts[p.index()] >= 2 && board.province(p).unit.is_none())
            .collect();

        let mut report = Vec::with_capacity(dislodged.len());
        for (unit, province, attacker_from, convoyed) in dislodged {
            let retreats = retreat_options(board, unit, attacker_from, convoyed, &standoffs, options);
            debug!(unit = %unit, province = %board.province(province).name, ?retreats, "unit dislodged");
            if let Some(u) = board.unit_mut(unit) {
                u.retreat_options = Some(retreats.clone());
            }
            if let Some(outcome) = outcomes.iter_mut().find(|r| r.unit == unit) {
                outcome.result = OrderResult::Dislodged;
            }
            report.push(DislodgedUnit {
                unit,
                province,
                attacker_from,
                retreat_options: retreats,
            });
        }

        board.clear_orders();
        Ok(Adjudication {
            outcomes,
            invalid_orders: invalid,
            dislodged: report,
        })
    }
}

/// Adjudicates the board's movement orders under the standard rules.
pub fn adjudicate(board: &mut Board) -> Result<Adjudication, AdjudicationError> {
    adjudicate_with(board, AdjudicationOptions::default())
}

pub fn adjudicate_with(board: &mut Board, options: AdjudicationOptions) -> Result<Adjudication, AdjudicationError> {
    Adjudicator::new(board, options)?.run()
}

fn order_result(o: &AdjudicableOrder) -> OrderResult {
    match (o.kind, o.resolution) {
        (_, Resolution::Succeeds) => OrderResult::Succeeded,
        (OrderKind::Move, Resolution::Fails) => OrderResult::Bounced,
        (OrderKind::Support, Resolution::Fails) => OrderResult::Cut,
        (_, Resolution::Fails) => OrderResult::Failed,
    }
}

/// The coast a moving unit ends up on: the ordered one, or for a fleet
/// ordered to a bare province, the one coast it can reach.
fn arrival_coast(board: &Board, unit: UnitId, ordered: Location, dest: ProvinceId) -> Option<CoastId> {
    let u = board.unit(unit)?;
    if u.unit_type == UnitType::Army || board.province(dest).is_sea() {
        return None;
    }
    ordered
        .coast()
        .or_else(|| board.reachable_coasts(u.location(), dest).first().copied())
}

/// Provinces a dislodged unit may retreat to. Never the attacker's origin,
/// unless the attack came by convoy.
fn retreat_options(
    board: &Board,
    unit: UnitId,
    attacker_from: ProvinceId,
    convoyed: bool,
    standoffs: &BTreeSet<ProvinceId>,
    options: AdjudicationOptions,
) -> BTreeSet<ProvinceId> {
    let Some(u) = board.unit(unit) else {
        return BTreeSet::new();
    };
    let mut out = if options.restrict_retreats {
        let at = u.location();
        board
            .adjacent_provinces(at)
            .into_iter()
            .filter(|&p| {
                board.can_reach(u.unit_type, at, p)
                    && board.province(p).unit.is_none()
                    && !standoffs.contains(&p)
            })
            .collect()
    } else {
        board.province(u.province).adjacent.clone()
    };
    if !convoyed || !options.restrict_retreats {
        out.remove(&attacker_from);
    }
    out
}

fn check_structure(board: &Board) -> Result<(), AdjudicationError> {
    board.check_references()?;
    for (id, unit) in board.units() {
        let p = board.province(unit.province);
        if p.unit != Some(id) && p.dislodged_unit != Some(id) {
            return Err(AdjudicationError::Misplaced {
                unit: id,
                province: p.name.clone(),
            });
        }
        if p.dislodged_unit == Some(id) {
            return Err(AdjudicationError::PendingRetreat(p.name.clone()));
        }
        if let Some(order) = unit.order.filter(Order::is_retreat) {
            return Err(AdjudicationError::UnexpectedOrder { unit: id, order });
        }
    }
    Ok(())
}

/// Replaces every invalid order with hold, repeating until no order changes
/// so that supports and convoys of downgraded orders are caught as well.
fn downgrade_invalid_orders(board: &mut Board, strict: bool) -> Vec<InvalidOrder> {
    let units = board.standing_units();
    let mut invalid = Vec::new();
    loop {
        let mut changed = false;
        for &unit in &units {
            let order = board.unit(unit).and_then(|u| u.order);
            if order == Some(Order::Hold) {
                continue;
            }
            if let Err(reason) = unit_order_is_valid(board, unit, order.as_ref(), strict) {
                debug!(unit = %unit, ?order, %reason, "order replaced by hold");
                invalid.push(InvalidOrder { unit, order, reason });
                if let Some(u) = board.unit_mut(unit) {
                    u.order = Some(Order::Hold);
                }
                changed = true;
            }
        }
        if !changed {
            return invalid;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::classic_board;

    struct Game {
        board: Board,
    }

    impl Game {
        fn new() -> Self {
            Game {
                board: classic_board().unwrap(),
            }
        }

        fn army(&mut self, player: &str, at: &str) -> UnitId {
            self.place(player, UnitType::Army, at)
        }

        fn fleet(&mut self, player: &str, at: &str) -> UnitId {
            self.place(player, UnitType::Fleet, at)
        }

        fn place(&mut self, player: &str, unit_type: UnitType, at: &str) -> UnitId {
            let pid = self.board.player_id(player).unwrap();
            let loc = self.board.location(at).unwrap();
            self.board.add_unit(pid, unit_type, loc).unwrap()
        }

        fn loc(&self, name: &str) -> Location {
            self.board.location(name).unwrap()
        }

        fn prov(&self, name: &str) -> ProvinceId {
            self.board.province_id(name).unwrap()
        }

        fn order(&mut self, unit: UnitId, order: Order) {
            self.board.set_order(unit, order).unwrap();
        }

        fn mv(&mut self, unit: UnitId, to: &str) {
            let destination = self.loc(to);
            self.order(unit, Order::Move { destination });
        }

        fn support(&mut self, unit: UnitId, source: UnitId, to: &str) {
            let destination = self.loc(to);
            self.order(unit, Order::Support { source, destination });
        }

        fn resolutions(&mut self) -> Vec<(UnitId, Resolution)> {
            let mut adj = Adjudicator::new(&mut self.board, AdjudicationOptions::default()).unwrap();
            adj.resolve_all();
            adj.orders().iter().map(|o| (o.unit, o.resolution)).collect()
        }
    }

    fn resolution_of(results: &[(UnitId, Resolution)], unit: UnitId) -> Resolution {
        results.iter().find(|(u, _)| *u == unit).map(|(_, r)| *r).unwrap()
    }

    #[test]
    fn unopposed_move_succeeds() {
        let mut g = Game::new();
        let a = g.army("France", "par");
        g.mv(a, "bur");
        let results = g.resolutions();
        assert_eq!(resolution_of(&results, a), Resolution::Succeeds);
    }

    #[test]
    fn every_order_ends_resolved() {
        let mut g = Game::new();
        let a = g.army("France", "par");
        let b = g.army("Germany", "mun");
        let c = g.army("Germany", "ruh");
        g.mv(a, "bur");
        g.mv(b, "bur");
        g.support(c, b, "bur");
        let mut adj = Adjudicator::new(&mut g.board, AdjudicationOptions::default()).unwrap();
        adj.resolve_all();
        assert!(adj.orders().iter().all(AdjudicableOrder::is_resolved));
        let again: Vec<Resolution> = (0..adj.orders().len()).map(|i| adj.resolve_order(i)).collect();
        let first: Vec<Resolution> = adj.orders().iter().map(|o| o.resolution).collect();
        assert_eq!(again, first);
    }

    #[test]
    fn supports_attach_to_matching_orders() {
        let mut g = Game::new();
        let a = g.army("Germany", "mun");
        let b = g.army("Germany", "ruh");
        let c = g.army("Germany", "kie");
        g.mv(a, "bur");
        g.support(b, a, "bur");
        g.order(c, Order::Hold);
        let adj = Adjudicator::new(&mut g.board, AdjudicationOptions::default()).unwrap();
        let mover = adj.orders().iter().find(|o| o.unit == a).unwrap();
        assert_eq!(mover.supports.len(), 1);
        let holder = adj.orders().iter().find(|o| o.unit == c).unwrap();
        assert!(holder.supports.is_empty());
    }

    #[test]
    fn update_before_resolution_is_rejected() {
        let mut g = Game::new();
        let a = g.army("France", "par");
        g.mv(a, "bur");
        let adj = Adjudicator::new(&mut g.board, AdjudicationOptions::default()).unwrap();
        assert_eq!(adj.update_board().err(), Some(AdjudicationError::Unresolved { count: 1 }));
        assert_eq!(g.board.unit(a).unwrap().province, g.prov("par"));
    }

    #[test]
    fn retreat_orders_are_rejected() {
        let mut g = Game::new();
        let a = g.army("France", "par");
        g.order(a, Order::RetreatDisband);
        assert_eq!(
            Adjudicator::new(&mut g.board, AdjudicationOptions::default()).err(),
            Some(AdjudicationError::UnexpectedOrder {
                unit: a,
                order: Order::RetreatDisband,
            })
        );
    }

    #[test]
    fn pending_retreats_are_rejected() {
        let mut g = Game::new();
        let a = g.army("France", "par");
        let b = g.army("Germany", "bur");
        let c = g.army("Germany", "pic");
        g.mv(b, "par");
        g.support(c, b, "par");
        adjudicate(&mut g.board).unwrap();
        assert!(g.board.unit(a).unwrap().is_dislodged());
        assert_eq!(
            adjudicate(&mut g.board).err(),
            Some(AdjudicationError::PendingRetreat("par".into()))
        );
    }

    #[test]
    fn deserialized_board_with_dangling_ids_is_rejected() {
        let mut g = Game::new();
        let a = g.army("France", "par");
        g.mv(a, "bur");
        let mut json = serde_json::to_value(&g.board).unwrap();
        json["units"][0]["province"] = serde_json::json!(900);
        let mut board: Board = serde_json::from_value(json).unwrap();
        assert_eq!(
            adjudicate(&mut board).err(),
            Some(AdjudicationError::Board(BoardError::DanglingReference("unit #0".into())))
        );
        assert!(crate::resolve::adjudicate_retreats(&mut board).is_err());
    }

    #[test]
    fn invalid_support_chain_is_downgraded() {
        let mut g = Game::new();
        let a = g.army("Germany", "mun");
        let b = g.army("Germany", "ruh");
        // Moving into the sea is invalid, which makes the support mismatch.
        g.mv(a, "nth");
        g.support(b, a, "kie");
        let mut board = g.board.clone();
        let adj = Adjudicator::new(&mut board, AdjudicationOptions::default()).unwrap();
        let invalid: Vec<UnitId> = adj.invalid_orders().iter().map(|i| i.unit).collect();
        assert!(invalid.contains(&a));
        assert!(invalid.contains(&b));
        assert!(adj.orders().iter().all(|o| o.kind == OrderKind::Hold));
    }

    #[test]
    fn core_promotes_half_core() {
        let mut g = Game::new();
        let a = g.army("Italy", "tun");
        let tun = g.prov("tun");
        let italy = g.board.player_id("Italy").unwrap();

        g.order(a, Order::Core);
        adjudicate(&mut g.board).unwrap();
        assert_eq!(g.board.province(tun).half_core, Some(italy));
        assert_eq!(g.board.province(tun).core, None);

        g.order(a, Order::Core);
        adjudicate(&mut g.board).unwrap();
        assert_eq!(g.board.province(tun).core, Some(italy));
        assert_eq!(g.board.province(tun).half_core, None);
    }

    #[test]
    fn attacked_core_fails() {
        let mut g = Game::new();
        let a = g.army("Italy", "tun");
        let f = g.fleet("France", "naf");
        g.order(a, Order::Core);
        g.mv(f, "tun");
        let report = adjudicate(&mut g.board).unwrap();
        assert_eq!(report.result_for(a), Some(OrderResult::Failed));
        assert_eq!(g.board.province(g.prov("tun")).half_core, None);
    }

    #[test]
    fn fleet_arrives_on_the_only_reachable_coast() {
        let mut g = Game::new();
        let f = g.fleet("France", "gas");
        g.mv(f, "spa");
        adjudicate(&mut g.board).unwrap();
        let unit = g.board.unit(f).unwrap();
        assert_eq!(unit.province, g.prov("spa"));
        assert_eq!(unit.coast, g.board.coast_id("spa/nc"));
    }

    #[test]
    fn orders_are_cleared() {
        let mut g = Game::new();
        let a = g.army("France", "par");
        g.mv(a, "bur");
        adjudicate(&mut g.board).unwrap();
        assert!(g.board.units().all(|(_, u)| u.order.is_none()));
    }
}

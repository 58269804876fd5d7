use std::collections::HashMap;

use toko_types::mapping::AccountMappingValues;

use crate::primitives::*;

use super::error::MappingError;

/// The outcome of resolving the mapping table for one event: at most one
/// account per (side, amount role).
#[derive(Debug, Clone)]
pub struct ResolvedMappings {
    event_type: EventType,
    accounts: HashMap<(DebitOrCredit, AmountRole), AccountId>,
}

impl ResolvedMappings {
    pub fn account_for(&self, side: DebitOrCredit, role: AmountRole) -> Option<AccountId> {
        self.accounts.get(&(side, role)).copied()
    }

    pub fn require(
        &self,
        side: DebitOrCredit,
        role: AmountRole,
    ) -> Result<AccountId, MappingError> {
        self.account_for(side, role).ok_or(MappingError::NotFound {
            event_type: self.event_type,
            side,
            amount_role: role,
        })
    }

    pub fn account_ids(&self) -> Vec<AccountId> {
        self.accounts.values().copied().collect()
    }
}

/// Picks the winning mapping per (side, amount role). An exact-context
/// row beats any context-less default; within the winning tier the
/// highest priority wins and a tie at the top is a configuration error.
pub fn resolve(
    rows: &[AccountMappingValues],
    event_type: EventType,
    event_context: Option<EventContext>,
) -> Result<ResolvedMappings, MappingError> {
    let mut groups: HashMap<(DebitOrCredit, AmountRole), Vec<&AccountMappingValues>> =
        HashMap::new();
    for row in rows {
        if !row.active || row.event_type != event_type {
            continue;
        }
        let matches_context = match row.event_context {
            None => true,
            Some(ctx) => event_context == Some(ctx),
        };
        if !matches_context {
            continue;
        }
        groups
            .entry((row.side, row.amount_role))
            .or_default()
            .push(row);
    }

    let mut accounts = HashMap::new();
    for ((side, role), candidates) in groups {
        let specific: Vec<&AccountMappingValues> = candidates
            .iter()
            .copied()
            .filter(|row| row.event_context.is_some())
            .collect();
        let tier = if specific.is_empty() {
            candidates
        } else {
            specific
        };

        let top = tier
            .iter()
            .map(|row| row.priority)
            .max()
            .expect("tier is never empty");
        let winners: Vec<&AccountMappingValues> = tier
            .into_iter()
            .filter(|row| row.priority == top)
            .collect();
        if winners.len() > 1 {
            return Err(MappingError::Ambiguous {
                event_type,
                side,
                amount_role: role,
                priority: top,
                count: winners.len(),
            });
        }
        accounts.insert((side, role), winners[0].account_id);
    }

    Ok(ResolvedMappings {
        event_type,
        accounts,
    })
}

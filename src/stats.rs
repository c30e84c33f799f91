use log::debug;

use crate::github::{RepoSummary, UserProfile};

/// Per-language repository counter that remembers first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageCounts {
    entries: Vec<(String, u64)>,
}

impl LanguageCounts {
    pub fn increment(&mut self, language: &str) {
        match self.entries.iter_mut().find(|(name, _)| name == language) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((language.to_string(), 1)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest counts first, at most `limit` entries. The sort is stable, so ties
    /// keep the order in which the languages were first seen.
    pub fn ranked(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .entries
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    pub total_repos: u64,
    pub total_stars: u64,
    pub total_forks: u64,
    pub languages: LanguageCounts,
    pub public_repos: u64,
    pub followers: u64,
    pub following: u64,
    pub name: String,
    pub bio: String,
}

impl Stats {
    /// Fold the profile and the full repository listing into one record.
    ///
    /// Every repository counts toward `total_repos`; forks are left out of the
    /// star, fork and language tallies.
    pub fn aggregate(username: &str, profile: UserProfile, repos: &[RepoSummary]) -> Self {
        let mut stats = Self {
            total_repos: repos.len() as u64,
            total_stars: 0,
            total_forks: 0,
            languages: LanguageCounts::default(),
            public_repos: profile.public_repos,
            followers: profile.followers,
            following: profile.following,
            name: profile
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| username.to_string()),
            bio: profile.bio.unwrap_or_default(),
        };

        for repo in repos.iter().filter(|r| !r.fork) {
            stats.total_stars += repo.stargazers_count;
            stats.total_forks += repo.forks_count;

            if let Some(language) = repo.language.as_deref().filter(|l| !l.is_empty()) {
                stats.languages.increment(language);
            }
        }

        debug!("Aggregated stats: {stats:?}");
        stats
    }
}

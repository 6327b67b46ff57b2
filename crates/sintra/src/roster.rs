//! Built-in agent roster shown when the backend cannot list its agents.

use sintra_core::Agent;

struct RosterEntry {
    id: &'static str,
    name: &'static str,
    emoji: &'static str,
    role: &'static str,
    description: &'static str,
    specialties: [&'static str; 3],
    personality_traits: [&'static str; 2],
}

const ROSTER: [RosterEntry; 7] = [
    RosterEntry {
        id: "soshie",
        name: "Soshie",
        emoji: "📱",
        role: "Social Media Manager",
        description: "Expert en médias sociaux, création de contenu et engagement communautaire",
        specialties: [
            "Création de posts",
            "Stratégie de contenu",
            "Analyse des tendances",
        ],
        personality_traits: ["Créative et tendance", "Connaît les dernières trends"],
    },
    RosterEntry {
        id: "cassie",
        name: "Cassie",
        emoji: "💬",
        role: "Customer Support Specialist",
        description: "Experte en support client, résolution de problèmes et satisfaction client",
        specialties: [
            "Réponses aux questions",
            "Résolution de problèmes",
            "Gestion des réclamations",
        ],
        personality_traits: ["Empathique et patiente", "Excellente communication"],
    },
    RosterEntry {
        id: "seomi",
        name: "Seomi",
        emoji: "🔍",
        role: "SEO Specialist",
        description: "Expert en référencement naturel, optimisation SEO et analyse de mots-clés",
        specialties: [
            "Recherche de mots-clés",
            "Optimisation on-page",
            "Stratégie de backlinks",
        ],
        personality_traits: ["Analytique et méthodique", "Orientée données"],
    },
    RosterEntry {
        id: "dexter",
        name: "Dexter",
        emoji: "📊",
        role: "Data Analyst",
        description: "Expert en analyse de données, statistiques et insights business",
        specialties: ["Analyse de données", "Création de rapports", "Prévisions"],
        personality_traits: ["Précis et rigoureux", "Pensée analytique"],
    },
    RosterEntry {
        id: "buddy",
        name: "Buddy",
        emoji: "💼",
        role: "Business Development Manager",
        description: "Expert en développement business, stratégie et croissance",
        specialties: [
            "Stratégies de croissance",
            "Analyse de marché",
            "Business plans",
        ],
        personality_traits: ["Visionnaire et stratégique", "Orienté croissance"],
    },
    RosterEntry {
        id: "emmie",
        name: "Emmie",
        emoji: "📧",
        role: "Email Marketing Specialist",
        description: "Experte en email marketing, automation et conversion",
        specialties: [
            "Campagnes email",
            "Séquences d'automation",
            "Copywriting persuasif",
        ],
        personality_traits: ["Persuasive et convaincante", "Axée conversion"],
    },
    RosterEntry {
        id: "penn",
        name: "Penn",
        emoji: "✍️",
        role: "Copywriter",
        description: "Expert en rédaction publicitaire, contenu persuasif et storytelling",
        specialties: [
            "Copywriting publicitaire",
            "Headlines accrocheurs",
            "Landing pages",
        ],
        personality_traits: ["Créatif et percutant", "Maître des mots"],
    },
];

/// The seven specialized agents, in gallery order.
pub fn default_agents() -> Vec<Agent> {
    ROSTER
        .iter()
        .map(|entry| Agent {
            id: entry.id.to_string(),
            name: entry.name.to_string(),
            emoji: entry.emoji.to_string(),
            role: entry.role.to_string(),
            description: entry.description.to_string(),
            specialties: entry.specialties.iter().map(|s| s.to_string()).collect(),
            personality_traits: entry
                .personality_traits
                .iter()
                .map(|s| s.to_string())
                .collect(),
            preferred_tools: Vec::new(),
            task_count: 0,
        })
        .collect()
}

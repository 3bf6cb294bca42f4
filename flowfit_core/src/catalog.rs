//! Default exercise catalog and messaging tables.
//!
//! Each intensity tier carries an ordered exercise list, a pool of emotional
//! messages and a single post-workout meal suggestion. Order matters: the
//! local generator always takes a prefix of the exercise list.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Everything the local generator needs for one intensity tier
#[derive(Clone, Debug)]
pub struct TierContent {
    pub exercises: Vec<ExerciseTemplate>,
    pub messages: Vec<String>,
    pub meal_suggestion: String,
}

/// Read-only exercise catalog keyed by intensity tier
#[derive(Clone, Debug)]
pub struct Catalog {
    pub tiers: HashMap<IntensityTier, TierContent>,
}

impl Catalog {
    /// Ordered exercise templates for a tier (empty if the tier is missing)
    pub fn exercises_for(&self, tier: IntensityTier) -> &[ExerciseTemplate] {
        self.tiers
            .get(&tier)
            .map(|t| t.exercises.as_slice())
            .unwrap_or(&[])
    }

    pub fn messages_for(&self, tier: IntensityTier) -> &[String] {
        self.tiers
            .get(&tier)
            .map(|t| t.messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn meal_for(&self, tier: IntensityTier) -> &str {
        self.tiers
            .get(&tier)
            .map(|t| t.meal_suggestion.as_str())
            .unwrap_or("")
    }
}

fn template(
    name: &str,
    description: &str,
    duration: u32,
    sets: u32,
    reps: u32,
    intensity: IntensityTier,
) -> ExerciseTemplate {
    ExerciseTemplate {
        name: name.into(),
        description: description.into(),
        duration,
        sets,
        reps,
        intensity,
    }
}

/// Builds the default catalog
///
/// Prefer [`get_default_catalog`] outside tests.
pub fn build_default_catalog() -> Catalog {
    use IntensityTier::*;

    let mut tiers = HashMap::new();

    // ========================================================================
    // Low: gentle mobility and breathing
    // ========================================================================

    tiers.insert(
        Low,
        TierContent {
            exercises: vec![
                template(
                    "Alongamento de Gato-Vaca",
                    "De quatro apoios, alterne entre arquear e arredondar as costas suavemente. Respire profundamente.",
                    120, 2, 10, Low,
                ),
                template(
                    "Caminhada no Lugar",
                    "Caminhe no lugar em ritmo confortável, movimentando os braços naturalmente.",
                    180, 1, 1, Low,
                ),
                template(
                    "Respiração Profunda com Braços",
                    "Inspire levantando os braços, expire descendo. Movimento suave e consciente.",
                    120, 3, 8, Low,
                ),
                template(
                    "Rotação de Quadril",
                    "Em pé, faça círculos suaves com o quadril. Relaxe e respire.",
                    90, 2, 10, Low,
                ),
                template(
                    "Alongamento de Pernas Sentada",
                    "Sentada, estenda as pernas e alcance os pés suavemente. Sem forçar.",
                    120, 2, 8, Low,
                ),
            ],
            messages: vec![
                "Hoje é um dia para cuidar de você com carinho. Cada movimento suave é um ato de amor próprio. 💜".into(),
                "Seu corpo está pedindo gentileza, e você está ouvindo. Isso é força de verdade. 🌸".into(),
                "Não importa a intensidade, você está aqui. E isso já é uma vitória. 🌙".into(),
            ],
            meal_suggestion:
                "Smoothie de banana com aveia e mel. Leve, nutritivo e reconfortante. 🍌".into(),
        },
    );

    // ========================================================================
    // Medium: bodyweight strength
    // ========================================================================

    tiers.insert(
        Medium,
        TierContent {
            exercises: vec![
                template(
                    "Agachamento Livre",
                    "Pés na largura dos ombros, desça como se fosse sentar. Mantenha as costas retas.",
                    90, 3, 12, Medium,
                ),
                template(
                    "Flexão de Joelhos",
                    "Apoie os joelhos no chão, desça o peito mantendo o corpo alinhado.",
                    90, 3, 10, Medium,
                ),
                template(
                    "Prancha Modificada",
                    "Apoie antebraços e joelhos, mantenha o corpo reto por 20-30 segundos.",
                    90, 3, 3, Medium,
                ),
                template(
                    "Afundo Alternado",
                    "Dê um passo à frente, dobre os joelhos em 90°. Alterne as pernas.",
                    120, 3, 10, Medium,
                ),
                template(
                    "Elevação de Quadril",
                    "Deitada de costas, joelhos dobrados, eleve o quadril contraindo o glúteo.",
                    90, 3, 15, Medium,
                ),
            ],
            messages: vec![
                "Você está encontrando seu ritmo! Continue assim, respeitando seu corpo e sua mente. ✨".into(),
                "Cada repetição é um passo em direção à melhor versão de você. Siga em frente! 💪".into(),
                "Seu esforço de hoje está construindo a força de amanhã. Continue! 🌟".into(),
            ],
            meal_suggestion:
                "Omelete com legumes e uma fatia de pão integral. Proteína e energia balanceadas. 🥚".into(),
        },
    );

    // ========================================================================
    // High: plyometrics and full-body conditioning
    // ========================================================================

    tiers.insert(
        High,
        TierContent {
            exercises: vec![
                template(
                    "Burpee Modificado",
                    "Agache, apoie as mãos, estenda as pernas para trás, volte e pule.",
                    120, 4, 12, High,
                ),
                template(
                    "Agachamento com Salto",
                    "Agachamento tradicional seguido de um salto explosivo.",
                    90, 4, 15, High,
                ),
                template(
                    "Mountain Climbers",
                    "Posição de prancha, traga os joelhos alternadamente em direção ao peito rapidamente.",
                    90, 4, 20, High,
                ),
                template(
                    "Flexão Completa",
                    "Flexão tradicional com corpo totalmente alinhado, descendo até o peito quase tocar o chão.",
                    90, 4, 12, High,
                ),
                template(
                    "Prancha com Toque no Ombro",
                    "Posição de prancha, toque alternadamente cada ombro mantendo o corpo estável.",
                    90, 3, 16, High,
                ),
            ],
            messages: vec![
                "Que energia incrível! Aproveite esse momento e dê o seu melhor. Você é capaz! 🔥".into(),
                "Sua determinação está brilhando hoje! Continue assim, você está arrasando! ⚡".into(),
                "Esse é o seu momento! Mostre para você mesma do que é capaz! 🚀".into(),
            ],
            meal_suggestion:
                "Frango grelhado com batata doce e salada. Reponha suas energias com qualidade! 🍗".into(),
        },
    );

    Catalog { tiers }
}

impl Catalog {
    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for tier in IntensityTier::ALL {
            let Some(content) = self.tiers.get(&tier) else {
                errors.push(format!("Catalog has no '{}' tier", tier));
                continue;
            };

            if content.exercises.is_empty() {
                errors.push(format!("Tier '{}' has no exercises", tier));
            }

            for exercise in &content.exercises {
                if exercise.name.is_empty() {
                    errors.push(format!("Tier '{}' has an exercise with empty name", tier));
                }
                if exercise.duration == 0 {
                    errors.push(format!(
                        "Exercise '{}' in tier '{}' has zero duration",
                        exercise.name, tier
                    ));
                }
                if exercise.sets == 0 {
                    errors.push(format!(
                        "Exercise '{}' in tier '{}' has zero sets",
                        exercise.name, tier
                    ));
                }
                if exercise.intensity != tier {
                    errors.push(format!(
                        "Exercise '{}' is tagged '{}' but listed under '{}'",
                        exercise.name, exercise.intensity, tier
                    ));
                }
            }

            if content.messages.is_empty() {
                errors.push(format!("Tier '{}' has no emotional messages", tier));
            }
            if content.meal_suggestion.is_empty() {
                errors.push(format!("Tier '{}' has no meal suggestion", tier));
            }
        }

        errors
    }
}

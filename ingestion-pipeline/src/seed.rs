use std::path::Path;

use common::{error::AppError, utils::config::AppConfig};
use tracing::info;

const SAMPLE_COURSE_ID: &str = "intro-to-psychology";

const CHAPTER_1: &str = r#"# Introduction to Psychology

## What is Psychology?

Psychology is the scientific study of mind and behavior. It encompasses the biological influences, social pressures, and environmental factors that affect how people think, act, and feel.

## History of Psychology

Modern psychology began in 1879 when Wilhelm Wundt founded the first laboratory dedicated to psychological research in Leipzig, Germany. Since then, psychology has evolved into a multifaceted field with various schools of thought including structuralism, functionalism, psychoanalysis, behaviorism, and cognitive psychology.

## Major Perspectives

1. **Biological Perspective**: Focuses on the body, especially the brain and nervous system.
2. **Psychodynamic Perspective**: Emphasizes unconscious drives and conflicts.
3. **Behavioral Perspective**: Concentrates on observable behaviors.
4. **Cognitive Perspective**: Examines mental processes like thinking and problem-solving.
5. **Humanistic Perspective**: Stresses free will, conscious choices, and self-determination.
"#;

const CHAPTER_2: &str = r#"# Research Methods in Psychology

## The Scientific Method

Psychologists use the scientific method to conduct research:
1. Make observations
2. Form hypotheses
3. Test hypotheses through experiments or other studies
4. Analyze data
5. Draw conclusions
6. Report results

## Types of Research

### Experimental Research
Experiments involve manipulating one variable to determine if changes in one variable cause changes in another variable.

### Correlational Research
Correlational research examines the relationship between two or more variables without manipulation.

### Observational Research
Researchers observe behavior in natural environments without intervention.

## Ethical Considerations

Psychological research must follow ethical guidelines including informed consent, protection from harm, confidentiality, and debriefing.
"#;

const CHAPTER_3: &str = r#"# Biological Bases of Behavior

## Neurons

Neurons are specialized cells that transmit information throughout the nervous system. They consist of:
- Cell body (soma)
- Dendrites (receive signals)
- Axon (transmits signals)
- Synapses (connections between neurons)

## Nervous System

The nervous system is divided into:
1. **Central Nervous System (CNS)**: Brain and spinal cord
2. **Peripheral Nervous System (PNS)**: Nerves outside the CNS
   - Somatic nervous system (controls voluntary movements)
   - Autonomic nervous system (controls involuntary functions)
     * Sympathetic division (arousing)
     * Parasympathetic division (calming)

## Brain Structures

Key brain regions include:
- **Cerebral cortex**: Outer layer responsible for complex thought
- **Hippocampus**: Memory formation
- **Amygdala**: Emotional processing
- **Hypothalamus**: Homeostasis regulation
- **Cerebellum**: Motor coordination
"#;

/// Writes the bundled introductory psychology course so a fresh install has
/// something to answer questions about. Runs only when the course root is
/// absent or empty; existing course material is never touched.
pub async fn seed_sample_course(config: &AppConfig) -> Result<bool, AppError> {
    if !config.seed_sample_course {
        return Ok(false);
    }

    let root = Path::new(&config.course_data_path);
    if course_root_has_content(root).await? {
        return Ok(false);
    }

    let course_dir = root.join(SAMPLE_COURSE_ID);
    tokio::fs::create_dir_all(&course_dir).await?;

    let chapters = [
        ("chapter1.md", CHAPTER_1),
        ("chapter2.md", CHAPTER_2),
        ("chapter3.md", CHAPTER_3),
    ];
    for (name, content) in chapters {
        tokio::fs::write(course_dir.join(name), content).await?;
    }

    let metadata = serde_json::json!({
        "title": "Introduction to Psychology",
        "description": "An introductory course covering basic concepts in psychology",
        "chapters": chapters.map(|(name, _)| name),
    });
    tokio::fs::write(
        course_dir.join(&config.metadata_file_name),
        serde_json::to_vec_pretty(&metadata)?,
    )
    .await?;

    info!(course_id = SAMPLE_COURSE_ID, "seeded sample course");
    Ok(true)
}

async fn course_root_has_content(root: &Path) -> Result<bool, AppError> {
    let mut entries = match tokio::fs::read_dir(root).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };
    Ok(entries.next_entry().await?.is_some())
}

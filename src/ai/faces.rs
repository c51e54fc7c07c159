use serde::Serialize;

/// Euclidean distance between two face embeddings.
///
/// Embeddings of different length never match.
pub fn face_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Similarity shown to users: `(1 - distance) * 100`
pub fn similarity_percentage(distance: f32) -> f32 {
    (1.0 - distance) * 100.0
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FaceMatch {
    pub face1_index: usize,
    pub face2_index: usize,
    pub distance: f32,
    pub similarity_percentage: f32,
    pub is_match: bool,
}

/// Compare every face of one image with every face of another
pub fn compare_all(first: &[Vec<f32>], second: &[Vec<f32>], threshold: f32) -> Vec<FaceMatch> {
    let mut matches = Vec::with_capacity(first.len() * second.len());
    for (i, a) in first.iter().enumerate() {
        for (j, b) in second.iter().enumerate() {
            let distance = face_distance(a, b);
            matches.push(FaceMatch {
                face1_index: i,
                face2_index: j,
                distance,
                similarity_percentage: similarity_percentage(distance),
                is_match: distance < threshold,
            });
        }
    }
    matches
}

/// Highest-similarity pair, if any
pub fn best_match(matches: &[FaceMatch]) -> Option<FaceMatch> {
    matches
        .iter()
        .max_by(|a, b| a.similarity_percentage.total_cmp(&b.similarity_percentage))
        .cloned()
}

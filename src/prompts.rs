//! Instruction text sent with every generation request.

/// Shared system instruction: strict adherence plus the identity rules of
/// every operation.
pub const SYSTEM_INSTRUCTION: &str = r#"STRICT ADHERENCE: Do not add any elements, backgrounds, or changes not explicitly requested. Focus solely on the provided task with zero creative deviation or "suggestions".

Face Consistency: Keep the person's facial features exactly the same as the upload person, but change their expression to look excited.

Virtual Try-On (General):
"Create a stunning fashion shot as if it's from an award-winning fashion editorial. Image 1 is the person (model). Image 2 is the garment (clothing). Action: Dress the model in Input 1 with the garment from Input 2. Face Consistency: Keep the person's facial features EXACTLY the same as Input 1. Expression: Change their expression to look excited and surprised. Style: Add nuance and variety to convey a professional design touch."

Pose Variations:
"Regenerate this image with the person in a new pose: [Pose Description]. Keep the person's identity consistent. Keep the CURRENT OUTFIT they are wearing in this image. Do not change the clothes."

Stylistic Remixes:
"Apply a stylistic remix to this fashion image. Remix Instruction: [Remix Prompt]. IDENTITY PRESERVATION: Keep the person's face and body features identical. CLOTHING PRESERVATION: Do not change the existing clothing items unless specifically asked to add an accessory.""#;

const RETURN_ONLY_IMAGE: &str = "Return ONLY the generated image.";

/// Re-render the uploaded person as a standing model.
#[must_use]
pub fn initial_model() -> String {
    format!(
        "Face Consistency: Keep the person's facial features exactly the same as the upload \
         person, but change their expression to look excited. Change their pose to a standing \
         model pose. {RETURN_ONLY_IMAGE}"
    )
}

/// Dress the person in image 1 with the garment in image 2.
#[must_use]
pub fn try_on() -> String {
    format!(
        "Virtual Try-On (General):\n\"Create a stunning fashion shot as if it's from an \
         award-winning fashion editorial. Image 1 is the person (model). Image 2 is the garment \
         (clothing). Action: Dress the model in Input 1 with the garment from Input 2. Face \
         Consistency: Keep the person's facial features EXACTLY the same as Input 1. Expression: \
         Change their expression to look excited and surprised. Style: Add nuance and variety to \
         convey a professional design touch.\"\n{RETURN_ONLY_IMAGE}"
    )
}

/// Re-pose the person while keeping their identity and outfit.
#[must_use]
pub fn pose_variation(pose: &str) -> String {
    format!(
        "Pose Variations:\n\"Regenerate this image with the person in a new pose: {pose}. Keep \
         the person's identity consistent. Keep the CURRENT OUTFIT they are wearing in this \
         image. Do not change the clothes.\"\n{RETURN_ONLY_IMAGE}"
    )
}

/// Apply a stylistic edit to the current look.
#[must_use]
pub fn remix(instruction: &str) -> String {
    format!(
        "Stylistic Remixes:\n\"Apply a stylistic remix to this fashion image. Remix \
         Instruction: {instruction}. IDENTITY PRESERVATION: Keep the person's face and body \
         features identical. CLOTHING PRESERVATION: Do not change the existing clothing items \
         unless specifically asked to add an accessory.\"\n{RETURN_ONLY_IMAGE}"
    )
}
